//! Query parameter types for the list endpoints.
//!
//! Every field is kept as a raw string and interpreted leniently: an
//! unparseable filter value is ignored instead of failing the request.
//! The shared `search/page/per_page/sort/dir` parameters come from
//! [`ListParams`] via `#[serde(flatten)]`.

use catalog_core::cast_member::CastMemberType;
use catalog_core::listing::{parse_flag, parse_ids, ListParams, ListQuery};
use catalog_db::models::cast_member::CastMemberFilter;
use catalog_db::models::category::CategoryFilter;
use catalog_db::models::genre::GenreFilter;
use catalog_db::models::video::VideoFilter;
use serde::Deserialize;

/// `GET /categories?is_active=`
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub is_active: Option<String>,
}

impl CategoryListParams {
    pub fn query(&self) -> ListQuery {
        ListQuery::from_params(&self.list)
    }

    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter {
            is_active: parse_flag(self.is_active.as_deref()),
        }
    }
}

/// `GET /genres?is_active=&categories=<id,id>`
#[derive(Debug, Default, Deserialize)]
pub struct GenreListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub is_active: Option<String>,
    pub categories: Option<String>,
}

impl GenreListParams {
    pub fn query(&self) -> ListQuery {
        ListQuery::from_params(&self.list)
    }

    pub fn filter(&self) -> GenreFilter {
        GenreFilter {
            is_active: parse_flag(self.is_active.as_deref()),
            categories: parse_ids(self.categories.as_deref()),
        }
    }
}

/// `GET /cast_members?type=1|2`
#[derive(Debug, Default, Deserialize)]
pub struct CastMemberListParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(rename = "type")]
    pub member_type: Option<String>,
}

impl CastMemberListParams {
    pub fn query(&self) -> ListQuery {
        ListQuery::from_params(&self.list)
    }

    pub fn filter(&self) -> CastMemberFilter {
        CastMemberFilter {
            member_type: self
                .member_type
                .as_deref()
                .and_then(|v| v.trim().parse::<i16>().ok())
                .and_then(CastMemberType::from_id),
        }
    }
}

/// `GET /videos?categories=&genres=&cast_members=` (comma-separated ids)
#[derive(Debug, Default, Deserialize)]
pub struct VideoListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub categories: Option<String>,
    pub genres: Option<String>,
    pub cast_members: Option<String>,
}

impl VideoListParams {
    pub fn query(&self) -> ListQuery {
        ListQuery::from_params(&self.list)
    }

    pub fn filter(&self) -> VideoFilter {
        VideoFilter {
            categories: parse_ids(self.categories.as_deref()),
            genres: parse_ids(self.genres.as_deref()),
            cast_members: parse_ids(self.cast_members.as_deref()),
        }
    }
}
