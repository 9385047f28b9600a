/// Cart and order workflow
///
/// # Endpoints
///
/// - `POST   /orders/addToCart/:productId` - Add a product in a size to the cart
/// - `GET    /orders?filter=<status>` - The user's order in a status, with lines
/// - `PATCH  /orders/:orderId/complete` - Mark the cart order as paid
/// - `PATCH  /orders/lines/:orderDetailsId` - Change a cart line's size
/// - `DELETE /orders/lines/:orderDetailsId` - Remove a cart line
///
/// Every lookup is scoped to the authenticated user: other users' orders and
/// lines are reported as not found. Lines can only change while their order
/// is `onCart`; afterwards writes answer 409.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    routes::{non_blank, parse_id, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use storefront_shared::{
    auth::middleware::AuthContext,
    models::{
        order::{CartOutcome, Order, OrderStatus, OrderWithDetails},
        order_detail::{OrderDetail, MAX_SIZE_LENGTH},
    },
};

const ORDER_NOT_FOUND: &str = "Order not found";
const LINE_NOT_FOUND: &str = "Order detail not found";
const PRODUCT_NOT_FOUND: &str = "Product not found";
const NOT_ON_CART: &str = "Order is not on cart";

/// Body carrying a line's size
#[derive(Debug, Default, Deserialize)]
pub struct SizeRequest {
    pub size: Option<String>,
}

impl SizeRequest {
    /// The trimmed size, or 400 when it is missing, blank or too long
    fn require(self) -> ApiResult<String> {
        let size = non_blank(self.size).ok_or_else(|| ApiError::BadRequest("missing size".to_string()))?;

        if size.chars().count() > MAX_SIZE_LENGTH {
            return Err(ApiError::BadRequest(format!(
                "size must be at most {} characters",
                MAX_SIZE_LENGTH
            )));
        }

        Ok(size)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrderQuery {
    /// Order status; defaults to `onCart`
    pub filter: Option<String>,
}

fn resolve<T>(outcome: CartOutcome<T>, not_found: &str, user_id: i32, id: i32) -> ApiResult<T> {
    match outcome {
        CartOutcome::Applied(value) => Ok(value),
        CartOutcome::NotFound => {
            tracing::warn!(user_id, id, "{}", not_found);
            Err(ApiError::NotFound(not_found.to_string()))
        }
        CartOutcome::NotOnCart => {
            tracing::warn!(user_id, id, "Rejected change to an order that is not on cart");
            Err(ApiError::Conflict(NOT_ON_CART.to_string()))
        }
    }
}

/// Add a product to the cart
///
/// ```text
/// POST /orders/addToCart/1
/// { "size": "L" }
/// ```
///
/// Creates the cart if the user has none. Each call adds a new line.
///
/// # Errors
///
/// - `400 Bad Request`: size missing (checked before anything else)
/// - `404 Not Found`: product does not exist
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(product_id): Path<String>,
    ApiJson(req): ApiJson<SizeRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let size = req.require()?;
    let product_id = parse_id(&product_id, PRODUCT_NOT_FOUND)?;

    if OrderDetail::add_to_cart(&state.db, auth.user_id, product_id, &size)
        .await?
        .is_none()
    {
        tracing::warn!(user_id = auth.user_id, product_id, "Add to cart for unknown product");
        return Err(ApiError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("successfully added product to your cart")),
    ))
}

/// Get the user's order in a status
///
/// ```text
/// GET /orders?filter=onCart
/// ```
///
/// Responds with the order and its `OrderDetails` (each with its `Product`),
/// or `null` when the user has no order in that status. For `Completed` the
/// most recent completed order is returned.
///
/// # Errors
///
/// - `400 Bad Request`: unknown status
pub async fn list_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ListOrderQuery>,
) -> ApiResult<Json<Option<OrderWithDetails>>> {
    let status = match non_blank(query.filter) {
        Some(raw) => raw
            .parse::<OrderStatus>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => OrderStatus::default(),
    };

    let order = Order::find_with_details(&state.db, auth.user_id, status).await?;

    Ok(Json(order))
}

/// Mark the cart order as paid
///
/// # Errors
///
/// - `404 Not Found`: no such order for this user
/// - `409 Conflict`: the order is already completed
pub async fn complete_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let order_id = parse_id(&order_id, ORDER_NOT_FOUND)?;

    let outcome = Order::complete(&state.db, order_id, auth.user_id).await?;
    resolve(outcome, ORDER_NOT_FOUND, auth.user_id, order_id)?;

    Ok(Json(MessageResponse::new("successfully update order's status")))
}

/// Change the size on a cart line
///
/// # Errors
///
/// - `400 Bad Request`: size missing
/// - `404 Not Found`: no such line for this user
/// - `409 Conflict`: the line's order is no longer on cart
pub async fn update_cart_line(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_detail_id): Path<String>,
    ApiJson(req): ApiJson<SizeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let size = req.require()?;
    let order_detail_id = parse_id(&order_detail_id, LINE_NOT_FOUND)?;

    let outcome = OrderDetail::update_size(&state.db, order_detail_id, auth.user_id, &size).await?;
    resolve(outcome, LINE_NOT_FOUND, auth.user_id, order_detail_id)?;

    Ok(Json(MessageResponse::new("successfully update order's size")))
}

/// Remove a line from the cart
///
/// # Errors
///
/// - `404 Not Found`: no such line for this user
/// - `409 Conflict`: the line's order is no longer on cart
pub async fn delete_cart_line(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_detail_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let order_detail_id = parse_id(&order_detail_id, LINE_NOT_FOUND)?;

    let outcome = OrderDetail::delete_from_cart(&state.db, order_detail_id, auth.user_id).await?;
    resolve(outcome, LINE_NOT_FOUND, auth.user_id, order_detail_id)?;

    Ok(Json(MessageResponse::new(
        "successfully removed selected item from your cart",
    )))
}
