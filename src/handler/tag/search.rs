use std::cmp::Ordering;

use mongodb::bson::{doc, Bson, Document};
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use crate::utils::mongo::{escape_regex, read_all};
use actix_web::{web, Error, HttpResponse};
use crate::model::tag::Tag;

/// How many tags a lookup returns. The legacy single-tag endpoint used 10;
/// the canonical listing ships with 5.
pub const TAG_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Query {
    query: Option<String>,
    /// Comma separated tag uuids to leave out of the result.
    exclude: Option<String>,
}

pub async fn task(query: web::Query<Query>) -> Result<HttpResponse, Error> {
    let exclude: Vec<Bson> = query.exclude
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| Bson::String(id.to_string()))
        .collect();

    let db = MongoDB.connect();
    let collection = db.collection::<Tag>("tag");

    let text = query.query
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    // Empty query falls back to plain popularity.
    if text.is_empty() {
        let mut filter = doc!{};
        if !exclude.is_empty() {
            filter.insert("uuid", doc!{ "$nin": exclude.clone() });
        }

        let result = collection
            .find(filter)
            .sort(doc!{ "count": -1 })
            .limit(TAG_SEARCH_LIMIT as i64)
            .await;

        if let Err(error) = &result {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        }

        let tags = match read_all(result.unwrap()).await {
            Ok(tags) => tags,
            Err(error) => {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            },
        };

        return Ok(
            HttpResponse::Ok()
            .content_type("application/json")
            .json(tags)
        );
    }

    let stripped = text.replace('-', "");

    let mut filter = candidate_filter(&stripped);
    if !exclude.is_empty() {
        filter.insert("uuid", doc!{ "$nin": exclude.clone() });
    }

    let result = collection.find(filter).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let candidates = match read_all(result.unwrap()).await {
        Ok(candidates) => candidates,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    let tags = rank(candidates, &text, TAG_SEARCH_LIMIT);

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(tags)
    )
}

/// Store-side prefilter. The loosest of the four match predicates is
/// "hyphen-stripped name contains hyphen-stripped query", which a regex
/// tolerating hyphens between the stripped query's characters captures
/// exactly; the precise tiers are computed in-process afterwards.
fn candidate_filter(stripped_query: &str) -> Document {
    let pattern = stripped_query
        .chars()
        .map(|c| escape_regex(&c.to_string()))
        .collect::<Vec<String>>()
        .join("-*");

    doc!{ "name": { "$regex": pattern, "$options": "i" } }
}

/// Discrete match tier, evaluated most-specific first. `None` means the
/// name matches none of the four predicates and is not a candidate at all,
/// however popular the tag.
fn match_tier(name: &str, query: &str, stripped_query: &str) -> Option<i64> {
    let name = name.to_lowercase();
    let stripped_name = name.replace('-', "");

    if name.starts_with(query) {
        Some(10_000)
    }
    else if stripped_name.starts_with(stripped_query) {
        Some(8_000)
    }
    else if name.contains(query) {
        Some(5_000)
    }
    else if stripped_name.contains(stripped_query) {
        Some(3_000)
    }
    else {
        None
    }
}

/// Composite relevance: match tier plus `ln(count + 1) * 1000`, so
/// popularity nudges ordering within a tier but never beats a higher one.
fn score(name: &str, count: i64, query: &str, stripped_query: &str) -> Option<f64> {
    let tier = match_tier(name, query, stripped_query)?;
    Some(tier as f64 + ((count.max(0) + 1) as f64).ln() * 1000.0)
}

fn rank(candidates: Vec<Tag>, query: &str, limit: usize) -> Vec<Tag> {
    let stripped_query = query.replace('-', "");

    let mut scored: Vec<(f64, Tag)> = candidates
        .into_iter()
        .filter_map(|tag| {
            score(&tag.name, tag.count, query, &stripped_query)
                .map(|score| (score, tag))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.uuid.cmp(&b.1.uuid))
    });

    scored.truncate(limit);
    scored.into_iter().map(|(_, tag)| tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(uuid: &str, name: &str, count: i64) -> Tag {
        Tag {
            uuid: uuid.to_string(),
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn tiers_are_evaluated_most_specific_first() {
        assert_eq!(match_tier("foobaz", "foo", "foo"), Some(10_000));
        assert_eq!(match_tier("f-oo", "foo", "foo"), Some(8_000));
        assert_eq!(match_tier("xfoo", "foo", "foo"), Some(5_000));
        assert_eq!(match_tier("xf-oo", "foo", "foo"), Some(3_000));
        assert_eq!(match_tier("bar", "foo", "foo"), None);
    }

    #[test]
    fn tier_beats_any_amount_of_popularity() {
        // "xfoo" is wildly popular but only a substring match; the
        // stripped-prefix "f-oo" and the raw-prefix "foobaz" still win.
        let ranked = rank(
            vec![
                tag("t1", "xfoo", 1_000_000),
                tag("t2", "f-oo", 0),
                tag("t3", "foobaz", 0),
            ],
            "foo",
            5,
        );

        let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["foobaz", "f-oo", "xfoo"]);
    }

    #[test]
    fn popularity_orders_within_a_tier() {
        let ranked = rank(
            vec![
                tag("t1", "parking", 1),
                tag("t2", "park", 50),
            ],
            "park",
            5,
        );

        let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["park", "parking"]);
    }

    #[test]
    fn non_matching_tags_are_dropped_entirely() {
        let ranked = rank(
            vec![
                tag("t1", "unrelated", 9_999),
                tag("t2", "parking", 0),
            ],
            "park",
            5,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "parking");
    }

    #[test]
    fn results_are_truncated_to_the_limit() {
        let candidates = (0..10)
            .map(|i| tag(&format!("t{}", i), &format!("park{}", i), 0))
            .collect();

        let ranked = rank(candidates, "park", TAG_SEARCH_LIMIT);
        assert_eq!(ranked.len(), TAG_SEARCH_LIMIT);
    }

    #[test]
    fn exact_ties_fall_back_to_id_order() {
        let ranked = rank(
            vec![
                tag("t2", "parkb", 0),
                tag("t1", "parka", 0),
            ],
            "park",
            5,
        );

        assert_eq!(ranked[0].uuid, "t1");
        assert_eq!(ranked[1].uuid, "t2");
    }

    #[test]
    fn prefix_match_with_one_use_scores_ten_thousand_and_change() {
        // ln(2) * 1000 on top of the 10000 prefix tier.
        let value = score("parking", 1, "park", "park").unwrap();
        assert!((value - 10_693.147).abs() < 0.01, "got {}", value);
    }

    #[test]
    fn candidate_filter_tolerates_hyphens_between_characters() {
        let filter = candidate_filter("foo");
        let regex = filter.get_document("name").unwrap().get_str("$regex").unwrap();
        assert_eq!(regex, "f-*o-*o");
    }
}
