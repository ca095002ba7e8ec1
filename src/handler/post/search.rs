use chrono::{DateTime, Local, NaiveTime, Utc};
use mongodb::bson::{doc, Bson, Document};
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::geo::haversine_km;
use crate::utils::response::Response;
use crate::utils::mongo::read_all;
use actix_web::{web, Error, HttpResponse};
use crate::model::post::Post;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
    tags_ids: Option<Vec<String>>,
    position: Option<Position>,
}

pub async fn task(form_data: web::Json<ReqBody>) -> Result<HttpResponse, Error> {
    let filter = build_filter(&form_data);

    let db = MongoDB.connect();
    let collection = db.collection::<Post>("post");
    let result = collection.find(filter).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let mut posts = match read_all(result.unwrap()).await {
        Ok(posts) => posts,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    // Distance ordering happens in-process after the store-side prefilter.
    if let Some(position) = &form_data.position {
        order_by_distance(&mut posts, position);
    }

    let rendered = match super::present_many(&db, &posts).await {
        Ok(rendered) => rendered,
        Err(error) => return Ok(error),
    };

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(rendered)
    )
}

/// Missing window bounds default to the current local calendar day.
fn build_filter(form_data: &ReqBody) -> Document {
    let now = Local::now();

    let date_from = form_data.date_from
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| {
            now.with_time(NaiveTime::MIN)
                .single()
                .unwrap_or(now)
                .timestamp_millis()
        });

    let date_to = form_data.date_to
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
            now.with_time(end_of_day)
                .single()
                .unwrap_or(now)
                .timestamp_millis()
        });

    let mut filter = doc!{
        "created_at": { "$gte": date_from, "$lte": date_to },
    };

    // Superset semantics: the post must carry every requested tag.
    if let Some(tags_ids) = &form_data.tags_ids {
        if !tags_ids.is_empty() {
            let tag_ids: Vec<Bson> = tags_ids
                .iter()
                .map(|id| Bson::String(id.clone()))
                .collect();

            filter.insert("tags", doc!{ "$all": tag_ids });
        }
    }

    filter
}

fn order_by_distance(posts: &mut [Post], position: &Position) {
    posts.sort_by(|a, b| {
        let da = haversine_km(position.latitude, position.longitude, a.latitude, a.longitude);
        let db = haversine_km(position.latitude, position.longitude, b.latitude, b.longitude);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(uuid: &str, latitude: f64, longitude: f64) -> Post {
        Post {
            uuid: uuid.to_string(),
            author_id: "u1".to_string(),
            title: uuid.to_string(),
            content: "".to_string(),
            icon_id: "i1".to_string(),
            latitude,
            longitude,
            location: "".to_string(),
            tags: vec![],
            is_anonymous: false,
            created_at: 0,
        }
    }

    #[test]
    fn posts_are_ordered_by_proximity_to_the_reference_point() {
        // Reference: Warsaw. Krakow is closer than Berlin.
        let mut posts = vec![
            post("berlin", 52.5200, 13.4050),
            post("krakow", 50.0647, 19.9450),
            post("warsaw", 52.2297, 21.0122),
        ];

        order_by_distance(&mut posts, &Position {
            latitude: 52.2297,
            longitude: 21.0122,
        });

        let order: Vec<&str> = posts.iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(order, vec!["warsaw", "krakow", "berlin"]);
    }

    #[test]
    fn filter_requires_every_requested_tag() {
        let form_data = ReqBody {
            date_from: None,
            date_to: None,
            tags_ids: Some(vec!["a".to_string(), "b".to_string()]),
            position: None,
        };

        let filter = build_filter(&form_data);
        let all = filter.get_document("tags").unwrap().get_array("$all").unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn explicit_window_bounds_are_used_verbatim() {
        let from = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let to = "2026-01-31T23:59:59Z".parse::<DateTime<Utc>>().unwrap();

        let filter = build_filter(&ReqBody {
            date_from: Some(from),
            date_to: Some(to),
            tags_ids: None,
            position: None,
        });

        let window = filter.get_document("created_at").unwrap();
        assert_eq!(window.get_i64("$gte").unwrap(), from.timestamp_millis());
        assert_eq!(window.get_i64("$lte").unwrap(), to.timestamp_millis());
    }
}
