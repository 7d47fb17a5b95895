//! HTTP client for a PostgREST-style backend.
//!
//! Tables live under `{base}/rest/v1/{table}`. Rows are filtered with
//! `column=eq.value` query parameters and inserted with `POST`; an insert
//! that must return the stored row sends `Prefer: return=representation`.
//!
//! Authentication: the project API key goes in both the `apikey` header and
//! as a bearer token.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use bella_core::{Email, OrderId, OrderStatus, ProductId};

use super::{
    BackendError, CatalogBackend, CatalogProduct, Customer, NewOrder, NewOrderItem, OrderBackend,
    OrderItemDetail, OrderRecord, OrderSummary, SellerBackend,
};
use crate::config::BackendConfig;

const USERS_TABLE: &str = "users";
const PRODUCTS_TABLE: &str = "products";
const ORDERS_TABLE: &str = "orders";
const ORDER_ITEMS_TABLE: &str = "order_items";

/// Columns of an order listing, with the customer embedded.
const ORDER_SUMMARY_SELECT: &str = "id,created_at,total_price,status,users(full_name,phone)";
const ORDER_ITEM_SELECT: &str = "quantity,unit_price,products(name)";

/// Most orders a listing fetches.
const ORDER_PAGE: usize = 100;

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

/// Backend client.
#[derive(Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut apikey = HeaderValue::from_str(key)
            .map_err(|e| BackendError::Config(format!("Invalid API key format: {e}")))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| BackendError::Config(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
        })
    }

    /// URL of a table endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the base URL cannot be joined.
    pub fn table_url(&self, table: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| BackendError::Config(format!("Invalid backend URL: {e}")))
    }

    fn products_url(&self, id: Option<&ProductId>) -> Result<Url, BackendError> {
        let mut url = self.table_url(PRODUCTS_TABLE)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            match id {
                Some(id) => {
                    query
                        .append_pair("id", &format!("eq.{id}"))
                        .append_pair("limit", "1");
                }
                None => {
                    query.append_pair("order", "name.asc");
                }
            }
        }
        Ok(url)
    }

    fn orders_url(&self, status: Option<OrderStatus>) -> Result<Url, BackendError> {
        let mut url = self.table_url(ORDERS_TABLE)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", ORDER_SUMMARY_SELECT)
                .append_pair("order", "created_at.desc")
                .append_pair("limit", &ORDER_PAGE.to_string());
            if let Some(status) = status {
                query.append_pair("status", &format!("eq.{}", status.as_str()));
            }
        }
        Ok(url)
    }

    /// Handle a response whose body is a JSON array of rows.
    async fn rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, BackendError> {
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Turn non-success statuses into [`BackendError::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl OrderBackend for RestBackend {
    #[instrument(skip(self, email), fields(email = %email))]
    async fn find_customer(&self, email: &Email) -> Result<Customer, BackendError> {
        let mut url = self.table_url(USERS_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("email", &format!("eq.{email}"))
            .append_pair("limit", "1");

        let response = self.client.get(url).send().await?;
        let customers: Vec<Customer> = Self::rows(response).await?;
        customers
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("customer {email}")))
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id, total = %order.total_price))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderRecord, BackendError> {
        let url = self.table_url(ORDERS_TABLE)?;
        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await?;

        let created: Vec<OrderRecord> = Self::rows(response).await?;
        let record = created
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Parse("insert returned no order row".to_string()))?;
        debug!(order_id = %record.id, "order created");
        Ok(record)
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), BackendError> {
        let url = self.table_url(ORDER_ITEMS_TABLE)?;
        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(items)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

impl CatalogBackend for RestBackend {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<CatalogProduct>, BackendError> {
        let response = self.client.get(self.products_url(None)?).send().await?;
        let products: Vec<CatalogProduct> = Self::rows(response).await?;
        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn find_product(&self, id: &ProductId) -> Result<CatalogProduct, BackendError> {
        let response = self.client.get(self.products_url(Some(id))?).send().await?;
        let products: Vec<CatalogProduct> = Self::rows(response).await?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))
    }
}

impl SellerBackend for RestBackend {
    #[instrument(skip(self))]
    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderSummary>, BackendError> {
        let response = self.client.get(self.orders_url(status)?).send().await?;
        Self::rows(response).await
    }

    #[instrument(skip(self, order_id), fields(order_id = %order_id))]
    async fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItemDetail>, BackendError> {
        let mut url = self.table_url(ORDER_ITEMS_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", ORDER_ITEM_SELECT)
            .append_pair("order_id", &format!("eq.{order_id}"));

        let response = self.client.get(url).send().await?;
        Self::rows(response).await
    }

    #[instrument(skip(self, order_id, status), fields(order_id = %order_id, status = status.as_str()))]
    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRecord, BackendError> {
        let mut url = self.table_url(ORDERS_TABLE)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{order_id}"));

        let response = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&StatusUpdate { status })
            .send()
            .await?;

        let updated: Vec<OrderRecord> = Self::rows(response).await?;
        let record = updated
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("order {order_id}")))?;
        debug!("order status updated");
        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(url: &str) -> BackendConfig {
        BackendConfig {
            url: Url::parse(url).unwrap(),
            api_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.k3y"),
        }
    }

    #[test]
    fn test_table_url() {
        let backend = RestBackend::new(&config("https://abc.example.co/")).unwrap();
        assert_eq!(
            backend.table_url("order_items").unwrap().as_str(),
            "https://abc.example.co/rest/v1/order_items"
        );
    }

    #[test]
    fn test_products_url() {
        let backend = RestBackend::new(&config("https://abc.example.co/")).unwrap();
        assert_eq!(
            backend.products_url(None).unwrap().as_str(),
            "https://abc.example.co/rest/v1/products?select=*&order=name.asc"
        );
        assert_eq!(
            backend
                .products_url(Some(&ProductId::new("7")))
                .unwrap()
                .as_str(),
            "https://abc.example.co/rest/v1/products?select=*&id=eq.7&limit=1"
        );
    }

    #[test]
    fn test_orders_url_embeds_customer() {
        let backend = RestBackend::new(&config("https://abc.example.co/")).unwrap();
        let all = backend.orders_url(None).unwrap();
        let pairs: Vec<(String, String)> = all.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("select".to_string(), ORDER_SUMMARY_SELECT.to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );

        let pending = backend.orders_url(Some(OrderStatus::Pending)).unwrap();
        assert!(pending.query().unwrap().ends_with("&status=eq.pendiente"));
    }

    #[test]
    fn test_status_update_body() {
        let body = serde_json::to_string(&StatusUpdate {
            status: OrderStatus::Cancelled,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"anulado"}"#);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut cfg = config("https://abc.example.co/");
        cfg.api_key = SecretString::from("bad\nkey");
        assert!(matches!(
            RestBackend::new(&cfg),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_client() {
        let backend = RestBackend::new(&config("https://abc.example.co/")).unwrap();
        let debug = format!("{backend:?}");
        assert!(debug.contains("abc.example.co"));
        assert!(!debug.contains("k3y"));
    }
}
