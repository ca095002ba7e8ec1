use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeZone};
use serde_json::json;
use mongodb::bson::{doc, Bson};
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use crate::utils::mongo::read_all;
use actix_web::{web, Error, HttpResponse};
use crate::model::post::{Post, PostSummary};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    year: i32,
    month: u32,
    offset: Option<i32>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    tags_ids: Option<Vec<String>>,
}

pub async fn task(form_data: web::Json<ReqBody>) -> Result<HttpResponse, Error> {
    let offset = form_data.offset.unwrap_or(0);

    let Some((start_date, end_date)) = preview_window(
        form_data.year,
        form_data.month,
        offset,
    ) else {
        return Ok(Response::bad_request("Invalid year or month"));
    };

    let date_from = local_millis(start_date, NaiveTime::MIN);
    let date_to = local_millis(
        end_date,
        NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    );

    let mut filter = doc!{
        "created_at": { "$gte": date_from, "$lte": date_to },
    };

    if let Some(tags_ids) = &form_data.tags_ids {
        if !tags_ids.is_empty() {
            let tag_ids: Vec<Bson> = tags_ids
                .iter()
                .map(|id| Bson::String(id.clone()))
                .collect();

            filter.insert("tags", doc!{ "$all": tag_ids });
        }
    }

    let db = MongoDB.connect();
    let collection = db.collection::<Post>("post");
    let result = collection.find(filter).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let posts = match read_all(result.unwrap()).await {
        Ok(posts) => posts,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    // Time-of-day filter and day bucketing happen in-process, on the same
    // local clock the window bounds were computed with.
    let mut total = 0usize;
    let mut buckets: BTreeMap<NaiveDate, Vec<PostSummary>> = BTreeMap::new();

    for post in posts {
        let Some(created_at) = Local.timestamp_millis_opt(post.created_at).single() else {
            continue;
        };

        if !in_time_window(created_at.time(), form_data.start_time, form_data.end_time) {
            continue;
        }

        total += 1;
        buckets
            .entry(created_at.date_naive())
            .or_default()
            .push(post.summary());
    }

    let mut dates = serde_json::Map::new();
    for (date, summaries) in &buckets {
        dates.insert(date.to_string(), json!({
            "count": summaries.len(),
            "posts": summaries,
        }));
    }

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "meta": {
                "start_date": start_date.to_string(),
                "end_date": end_date.to_string(),
                "total_posts": total,
            },
            "dates": dates,
        }))
    )
}

fn local_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    let now = Local::now();
    Local
        .from_local_datetime(&date.and_time(time))
        .single()
        .unwrap_or(now)
        .timestamp_millis()
}

/// Calendar-correct month shift: handles year rollover and clamps the
/// day-of-month to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // year, month and clamped day are valid by construction
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = match month {
        12 => (year + 1, 1),
        _ => (year, month + 1),
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
        .day()
}

/// Window spanning `[first day of (month - offset), last day of
/// (month + offset)]` inclusive.
pub fn preview_window(year: i32, month: u32, offset: i32) -> Option<(NaiveDate, NaiveDate)> {
    let base = NaiveDate::from_ymd_opt(year, month, 1)?;
    let start = add_months(base, -offset);
    let end = add_months(base, offset + 1).pred_opt()?;

    Some((start, end))
}

pub fn in_time_window(
    time: NaiveTime,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) -> bool {
    if let Some(start) = start {
        if time < start {
            return false;
        }
    }

    if let Some(end) = end {
        if time > end {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn add_months_rolls_over_the_year() {
        assert_eq!(add_months(ymd(2026, 1, 15), -1), ymd(2025, 12, 15));
        assert_eq!(add_months(ymd(2025, 12, 15), 2), ymd(2026, 2, 15));
    }

    #[test]
    fn add_months_clamps_the_day_of_month() {
        assert_eq!(add_months(ymd(2026, 1, 31), 1), ymd(2026, 2, 28));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2026, 3, 31), 1), ymd(2026, 4, 30));
    }

    #[test]
    fn january_with_offset_one_spans_december_through_february() {
        let (start, end) = preview_window(2026, 1, 1).unwrap();
        assert_eq!(start, ymd(2025, 12, 1));
        assert_eq!(end, ymd(2026, 2, 28));
    }

    #[test]
    fn zero_offset_covers_exactly_the_requested_month() {
        let (start, end) = preview_window(2026, 4, 0).unwrap();
        assert_eq!(start, ymd(2026, 4, 1));
        assert_eq!(end, ymd(2026, 4, 30));
    }

    #[test]
    fn invalid_month_yields_no_window() {
        assert!(preview_window(2026, 13, 0).is_none());
    }

    #[test]
    fn time_window_bounds_are_inclusive() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let night = NaiveTime::from_hms_opt(22, 0, 0).unwrap();

        assert!(in_time_window(noon, Some(nine), Some(five)));
        assert!(in_time_window(nine, Some(nine), Some(five)));
        assert!(in_time_window(five, Some(nine), Some(five)));
        assert!(!in_time_window(night, Some(nine), Some(five)));
        assert!(in_time_window(night, Some(nine), None));
    }
}
