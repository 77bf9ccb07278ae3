//! Product catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use loomworks_core::{Product, ProductId, ProductInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, fetched_or_banner, redirect_with_error, redirect_with_success};
use crate::api::ProductQuery;
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdmin;
use crate::session::Session;
use crate::state::AppState;

/// Category preselected on an empty product form.
pub const DEFAULT_CATEGORY: &str = "Bags";

/// Categories the store sells.
pub const CATEGORIES: [&str; 6] = [
    DEFAULT_CATEGORY,
    "Thaila",
    "Rubber",
    "Clothes",
    "Blouse",
    "Accessories",
];

/// How many products a listing page fetches.
const PRODUCT_FETCH_LIMIT: u32 = 100;

// =============================================================================
// Query and Form Types
// =============================================================================

/// Listing page query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Product form data; numbers arrive as text and are validated here.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    #[serde(default)]
    pub image_url: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Product row for the listing table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i64,
    pub low_stock: bool,
    pub image: Option<String>,
    pub featured: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            low_stock: product.is_low_stock(),
            image: product.primary_image().map(ToString::to_string),
            featured: product.featured,
        }
    }
}

/// Category dropdown entry.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Echoed form values for the add/edit page.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub title: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
    pub categories: Vec<CategoryOption>,
}

impl ProductFormView {
    /// Empty form defaulting to the usual category.
    fn empty() -> Self {
        Self::with_values("", "", "", DEFAULT_CATEGORY, "", "")
    }

    fn with_values(
        title: &str,
        description: &str,
        price: &str,
        category: &str,
        stock: &str,
        image_url: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            image_url: image_url.to_string(),
            categories: category_options(category),
        }
    }

    fn from_form(form: &ProductForm) -> Self {
        Self::with_values(
            &form.title,
            &form.description,
            &form.price,
            &form.category,
            &form.stock,
            &form.image_url,
        )
    }
}

impl From<&Product> for ProductFormView {
    fn from(product: &Product) -> Self {
        Self::with_values(
            &product.title,
            &product.description,
            &product.price.to_string(),
            &product.category,
            &product.stock.to_string(),
            product.primary_image().unwrap_or_default(),
        )
    }
}

/// Category options with one entry marked selected.
///
/// A category that predates the current list is appended so saving an old
/// product cannot silently recategorize it.
fn category_options(selected: &str) -> Vec<CategoryOption> {
    let mut options: Vec<CategoryOption> = CATEGORIES
        .iter()
        .map(|name| CategoryOption {
            name: (*name).to_string(),
            selected: *name == selected,
        })
        .collect();

    if !selected.is_empty() && !CATEGORIES.contains(&selected) {
        options.push(CategoryOption {
            name: selected.to_string(),
            selected: true,
        });
    }

    options
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub products: Vec<ProductRow>,
    pub q: String,
    pub filtered: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Add/edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    /// Only new products take an image URL; edits leave images alone.
    pub show_image: bool,
    pub form: ProductFormView,
    pub error: Option<String>,
}

// =============================================================================
// Filtering
// =============================================================================

/// Narrow the fetched products by search term.
///
/// The term matches the title or the category, case-insensitively. Empty
/// or missing terms do not filter.
fn filter_products(products: Vec<Product>, q: Option<&str>) -> Vec<Product> {
    let term = q.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

    products
        .into_iter()
        .filter(|product| {
            term.as_ref().is_none_or(|t| {
                product.title.to_lowercase().contains(t)
                    || product.category.to_lowercase().contains(t)
            })
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Product listing page.
#[instrument(skip(session, state))]
pub async fn index(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ProductsTemplate> {
    let upstream = ProductQuery {
        limit: Some(PRODUCT_FETCH_LIMIT),
        ..ProductQuery::default()
    };
    let (products, fetch_error) =
        fetched_or_banner(state.api().list_products(&upstream).await, "products")?;

    let q = query.q.unwrap_or_default();
    let filtered = !q.trim().is_empty();
    let products = filter_products(products.unwrap_or_default(), Some(q.as_str()));

    Ok(ProductsTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/products",
        pending_reviews: state.reviews().pending_count(),
        products: products.iter().map(ProductRow::from).collect(),
        q,
        filtered,
        error: query.error.or(fetch_error),
        success: query.success,
    })
}

/// New product form.
#[instrument(skip(session, state))]
pub async fn new(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
) -> ProductFormTemplate {
    ProductFormTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/products",
        pending_reviews: state.reviews().pending_count(),
        heading: "Add Product",
        submit_label: "Add Product",
        action: "/products".to_string(),
        show_image: true,
        form: ProductFormView::empty(),
        error: None,
    }
}

/// Create a product.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match validate_form(&form) {
        Ok(input) => input,
        Err(message) => {
            return Ok(form_with_error(&session, &state, None, &form, message).into_response());
        }
    };

    match state.api().create_product(&input).await {
        Ok(product) => {
            tracing::info!(id = %product.id, title = %product.title, "Product created");
            Ok(redirect_with_success("/products", "Product added successfully").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(form_with_error(&session, &state, None, &form, e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit product form, prefilled from the upstream record.
#[instrument(skip(session, state))]
pub async fn edit(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    match state.api().get_product(&id).await {
        Ok(product) => Ok(ProductFormTemplate {
            admin: AdminUserView::from(&session),
            current_path: "/products",
            pending_reviews: state.reviews().pending_count(),
            heading: "Edit Product",
            submit_label: "Save Changes",
            action: format!("/products/{id}"),
            show_image: false,
            form: ProductFormView::from(&product),
            error: None,
        }
        .into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(redirect_with_error("/products", &e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a product.
#[instrument(skip(session, state, form))]
pub async fn update(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match validate_form(&form) {
        Ok(input) => input,
        Err(message) => {
            return Ok(form_with_error(&session, &state, Some(&id), &form, message).into_response());
        }
    };

    match state.api().update_product(&id, &input).await {
        Ok(_product) => {
            tracing::info!(%id, "Product updated");
            Ok(redirect_with_success("/products", "Product updated successfully").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(form_with_error(&session, &state, Some(&id), &form, e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    match state.api().delete_product(&id).await {
        Ok(()) => {
            tracing::info!(%id, "Product deleted");
            Ok(redirect_with_success("/products", "Product deleted successfully"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/products", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Form Validation
// =============================================================================

/// Parse the text form into an API input, or the message to show.
fn validate_form(form: &ProductForm) -> std::result::Result<ProductInput, String> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    let price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid price".to_string())?;
    if price < Decimal::ZERO {
        return Err("Please enter a valid price".to_string());
    }

    let stock: i64 = form
        .stock
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid stock count".to_string())?;
    if stock < 0 {
        return Err("Please enter a valid stock count".to_string());
    }

    let image_url = form.image_url.trim();
    let images = if image_url.is_empty() {
        Vec::new()
    } else {
        vec![image_url.to_string()]
    };

    Ok(ProductInput {
        title: title.to_string(),
        description: form.description.trim().to_string(),
        price,
        category: form.category.clone(),
        stock,
        images,
    })
}

/// Re-render the form with the submitted values and an error banner.
fn form_with_error(
    session: &Session,
    state: &AppState,
    id: Option<&ProductId>,
    form: &ProductForm,
    message: String,
) -> ProductFormTemplate {
    let (heading, submit_label, action) = match id {
        Some(id) => ("Edit Product", "Save Changes", format!("/products/{id}")),
        None => ("Add Product", "Add Product", "/products".to_string()),
    };

    ProductFormTemplate {
        admin: AdminUserView::from(session),
        current_path: "/products",
        pending_reviews: state.reviews().pending_count(),
        heading,
        submit_label,
        action,
        show_image: id.is_none(),
        form: ProductFormView::from_form(form),
        error: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, category: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": format!("id-{title}"),
            "title": title,
            "price": 499.0,
            "category": category,
            "stock": 5
        }))
        .expect("product")
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let products = vec![product("Jute Tote", "Bags"), product("Silk Blouse", "Blouse")];
        let filtered = filter_products(products, Some("jute"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().map(|p| p.title.as_str()), Some("Jute Tote"));
    }

    #[test]
    fn test_filter_matches_category_too() {
        let products = vec![product("Jute Tote", "Bags"), product("Cotton Thaila", "Thaila")];
        let filtered = filter_products(products, Some("thai"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered.first().map(|p| p.title.as_str()),
            Some("Cotton Thaila")
        );
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let products = vec![product("A", "Bags"), product("B", "Thaila")];
        assert_eq!(filter_products(products.clone(), None).len(), 2);
        assert_eq!(filter_products(products, Some("  ")).len(), 2);
    }

    #[test]
    fn test_validate_form_parses_numbers() {
        let form = ProductForm {
            title: " Jute Tote ".to_string(),
            description: "Handwoven".to_string(),
            price: "499.50".to_string(),
            category: "Bags".to_string(),
            stock: "12".to_string(),
            image_url: "https://cdn.loomworks.shop/tote.jpg".to_string(),
        };

        let input = validate_form(&form).expect("valid");
        assert_eq!(input.title, "Jute Tote");
        assert_eq!(input.price, Decimal::new(49950, 2));
        assert_eq!(input.stock, 12);
        assert_eq!(input.images.len(), 1);
    }

    #[test]
    fn test_validate_form_rejects_bad_values() {
        let mut form = ProductForm {
            title: "Tote".to_string(),
            description: String::new(),
            price: "not-a-price".to_string(),
            category: "Bags".to_string(),
            stock: "3".to_string(),
            image_url: String::new(),
        };
        assert_eq!(
            validate_form(&form).expect_err("bad price"),
            "Please enter a valid price"
        );

        form.price = "-5".to_string();
        assert_eq!(
            validate_form(&form).expect_err("negative price"),
            "Please enter a valid price"
        );

        form.price = "10".to_string();
        form.stock = "3.5".to_string();
        assert_eq!(
            validate_form(&form).expect_err("bad stock"),
            "Please enter a valid stock count"
        );

        form.stock = "3".to_string();
        form.title = "   ".to_string();
        assert_eq!(validate_form(&form).expect_err("no title"), "Title is required");
    }

    #[test]
    fn test_empty_image_url_sends_no_images() {
        let form = ProductForm {
            title: "Tote".to_string(),
            description: String::new(),
            price: "10".to_string(),
            category: "Bags".to_string(),
            stock: "1".to_string(),
            image_url: "   ".to_string(),
        };
        assert!(validate_form(&form).expect("valid").images.is_empty());
    }

    #[test]
    fn test_category_options_mark_selection() {
        let options = category_options("Rubber");
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(selected, vec!["Rubber"]);
        assert_eq!(options.len(), CATEGORIES.len());
    }

    #[test]
    fn test_category_options_keep_retired_categories() {
        let options = category_options("Sarees");
        assert_eq!(options.len(), CATEGORIES.len() + 1);
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(selected, vec!["Sarees"]);
    }
}
