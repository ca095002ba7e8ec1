use futures::StreamExt;
use mongodb::{
    bson::Document,
    Collection,
    Cursor,
};

/// Find sorted by creation time, newest first unless `ascending`.
pub async fn find_sorted<T>(
    collection: &Collection<T>,
    filter: Document,
    ascending: bool,
    limit: Option<i64>,
) -> mongodb::error::Result<Cursor<T>>
where
    T: Unpin + Send + Sync,
{
    let sort_order = match ascending {
        true => 1,
        false => -1,
    };

    let mut find = collection
        .find(filter)
        .sort(mongodb::bson::doc! { "created_at": sort_order });

    if let Some(limit) = limit {
        find = find.limit(limit);
    }

    find.await
}

/// Drain a cursor into a Vec, failing on the first read error.
pub async fn read_all<T>(mut cursor: Cursor<T>) -> mongodb::error::Result<Vec<T>>
where
    T: serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    let mut items = Vec::new();
    while let Some(result) = cursor.next().await {
        items.push(result?);
    }

    Ok(items)
}

/// Escape regex metacharacters so user text can be embedded in a `$regex`.
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_regex_leaves_plain_text_alone() {
        assert_eq!(escape_regex("parking"), "parking");
    }

    #[test]
    fn escape_regex_escapes_metacharacters() {
        assert_eq!(escape_regex("c++ (tips)"), "c\\+\\+ \\(tips\\)");
    }
}
