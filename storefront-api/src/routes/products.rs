/// Product catalog
///
/// # Endpoints
///
/// - `GET /products?page=&limit=&search=&categoryId=` - One page of products
/// - `GET /products/:id` - A single product
///
/// Pages are 1-based. `limit` defaults to 8 and is clamped to 1..=100.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiQuery,
    routes::{non_blank, parse_id},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use storefront_shared::models::product::{Product, ProductFilter};

pub const DEFAULT_PAGE_SIZE: i64 = 8;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw query string; numbers are parsed by hand so bad input gets a JSON error
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category_id: Option<String>,
}

/// One page of products
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub data: Vec<Product>,
}

/// Resolved page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Parses `page` and `limit`
    ///
    /// Missing values take defaults; a page below 1 is treated as 1 and the
    /// limit is clamped into range.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> ApiResult<Self> {
        let number = |name: &str, raw: Option<&str>, default: i64| -> ApiResult<i64> {
            match raw.map(str::trim).filter(|v| !v.is_empty()) {
                None => Ok(default),
                Some(v) => v
                    .parse::<i64>()
                    .map_err(|_| ApiError::BadRequest(format!("{} must be a number", name))),
            }
        };

        Ok(Self {
            page: number("page", page, 1)?.max(1),
            limit: number("limit", limit, DEFAULT_PAGE_SIZE)?.clamp(1, MAX_PAGE_SIZE),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_items: i64) -> i64 {
        (total_items + self.limit - 1) / self.limit
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> ApiResult<Json<ProductPage>> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref())?;

    let category_id = match non_blank(query.category_id) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::BadRequest("categoryId must be a number".to_string()))?,
        ),
        None => None,
    };

    let filter = ProductFilter {
        search: non_blank(query.search),
        category_id,
    };

    let total_items = Product::count(&state.db, &filter).await?;
    let data = Product::list(&state.db, &filter, pagination.limit, pagination.offset()).await?;

    Ok(Json(ProductPage {
        total_items,
        total_pages: pagination.total_pages(total_items),
        current_page: pagination.page,
        data,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id, "Product not found")?;

    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}
