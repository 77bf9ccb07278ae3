//! Customer account route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use loomworks_core::{Customer, CustomerId, CustomerInput};
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUserView, fetched_or_banner, redirect_with_error, redirect_with_success};
use crate::api::CustomerQuery;
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdmin;
use crate::session::Session;
use crate::state::AppState;

/// How many customers a listing page fetches.
const CUSTOMER_FETCH_LIMIT: u32 = 100;

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

/// Customer form data.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

/// Account state toggle form data.
#[derive(Debug, Deserialize)]
pub struct SetActiveForm {
    pub is_active: bool,
}

// =============================================================================
// View Types
// =============================================================================

/// Customer row for the listing table.
#[derive(Debug, Clone)]
pub struct CustomerRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status_label: &'static str,
    pub is_active: bool,
    pub joined: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            full_name: customer.full_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            status_label: customer.status_label(),
            is_active: customer.is_active,
            joined: customer
                .created_at
                .as_ref()
                .map(filters::format_date)
                .unwrap_or_default(),
        }
    }
}

/// Echoed form values for the add/edit page.
#[derive(Debug, Clone, Default)]
pub struct CustomerFormView {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerFormView {
    /// Submitted values minus the password, which is never echoed back.
    fn from_form(form: &CustomerForm) -> Self {
        Self {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
        }
    }
}

impl From<&Customer> for CustomerFormView {
    fn from(customer: &Customer) -> Self {
        Self {
            full_name: customer.full_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Customer listing template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub customers: Vec<CustomerRow>,
    pub q: String,
    pub filtered: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Add/edit customer form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/form.html")]
pub struct CustomerFormTemplate {
    pub admin: AdminUserView,
    pub current_path: &'static str,
    pub pending_reviews: usize,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    /// New accounts need a password field; edits leave the credential alone.
    pub show_password: bool,
    pub form: CustomerFormView,
    pub error: Option<String>,
}

// =============================================================================
// Filtering
// =============================================================================

/// Narrow the fetched customers by search term.
///
/// The term matches name, email, or phone case-insensitively. Empty or
/// missing terms do not filter.
fn filter_customers(customers: Vec<Customer>, q: Option<&str>) -> Vec<Customer> {
    let term = q.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

    customers
        .into_iter()
        .filter(|customer| {
            term.as_ref().is_none_or(|t| {
                customer.full_name.to_lowercase().contains(t)
                    || customer.email.to_lowercase().contains(t)
                    || customer.phone.contains(t)
            })
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Customer listing page.
#[instrument(skip(session, state))]
pub async fn index(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<CustomersTemplate> {
    let upstream = CustomerQuery {
        limit: Some(CUSTOMER_FETCH_LIMIT),
        ..CustomerQuery::default()
    };
    let (customers, fetch_error) =
        fetched_or_banner(state.api().list_customers(&upstream).await, "customers")?;

    let q = query.q.unwrap_or_default();
    let filtered = !q.trim().is_empty();
    let customers = filter_customers(customers.unwrap_or_default(), Some(q.as_str()));

    Ok(CustomersTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/customers",
        pending_reviews: state.reviews().pending_count(),
        customers: customers.iter().map(CustomerRow::from).collect(),
        q,
        filtered,
        error: query.error.or(fetch_error),
        success: query.success,
    })
}

/// New customer form.
#[instrument(skip(session, state))]
pub async fn new(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
) -> CustomerFormTemplate {
    CustomerFormTemplate {
        admin: AdminUserView::from(&session),
        current_path: "/customers",
        pending_reviews: state.reviews().pending_count(),
        heading: "Add Customer",
        submit_label: "Add Customer",
        action: "/customers".to_string(),
        show_password: true,
        form: CustomerFormView::default(),
        error: None,
    }
}

/// Create a customer account.
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    let input = match validate_form(&form, true) {
        Ok(input) => input,
        Err(message) => {
            return Ok(form_with_error(&session, &state, None, &form, message).into_response());
        }
    };

    match state.api().create_customer(&input).await {
        Ok(customer) => {
            tracing::info!(id = %customer.id, email = %customer.email, "Customer created");
            Ok(redirect_with_success("/customers", "Customer added successfully").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(form_with_error(&session, &state, None, &form, e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit customer form, prefilled from the upstream record.
#[instrument(skip(session, state))]
pub async fn edit(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Response> {
    match state.api().get_customer(&id).await {
        Ok(customer) => Ok(CustomerFormTemplate {
            admin: AdminUserView::from(&session),
            current_path: "/customers",
            pending_reviews: state.reviews().pending_count(),
            heading: "Edit Customer",
            submit_label: "Save Changes",
            action: format!("/customers/{id}"),
            show_password: false,
            form: CustomerFormView::from(&customer),
            error: None,
        }
        .into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(redirect_with_error("/customers", &e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a customer's profile fields.
#[instrument(skip(session, state, form))]
pub async fn update(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    let input = match validate_form(&form, false) {
        Ok(input) => input,
        Err(message) => {
            return Ok(form_with_error(&session, &state, Some(&id), &form, message).into_response());
        }
    };

    match state.api().update_customer(&id, &input).await {
        Ok(_customer) => {
            tracing::info!(%id, "Customer updated");
            Ok(redirect_with_success("/customers", "Customer updated successfully").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(form_with_error(&session, &state, Some(&id), &form, e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Suspend or reactivate a customer account.
#[instrument(skip(state))]
pub async fn set_status(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Form(form): Form<SetActiveForm>,
) -> Result<Redirect> {
    match state.api().set_customer_active(&id, form.is_active).await {
        Ok(customer) => {
            tracing::info!(%id, is_active = customer.is_active, "Customer status changed");
            let message = if customer.is_active {
                "Customer activated"
            } else {
                "Customer suspended"
            };
            Ok(redirect_with_success("/customers", message))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/customers", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Delete a customer account.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_session): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Redirect> {
    match state.api().delete_customer(&id).await {
        Ok(()) => {
            tracing::info!(%id, "Customer deleted");
            Ok(redirect_with_success("/customers", "Customer deleted successfully"))
        }
        Err(e) if e.is_recoverable() => Ok(redirect_with_error("/customers", &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Form Validation
// =============================================================================

/// Parse the form into an API input, or the message to show.
///
/// A password is only required when creating; updates never touch it.
fn validate_form(
    form: &CustomerForm,
    require_password: bool,
) -> std::result::Result<CustomerInput, String> {
    let full_name = form.full_name.trim();
    let email = form.email.trim();
    let password = form.password.trim();

    if full_name.is_empty() || email.is_empty() || (require_password && password.is_empty()) {
        return Err("Please fill in all fields".to_string());
    }

    Ok(CustomerInput {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: form.phone.trim().to_string(),
        password: if require_password {
            Some(password.to_string())
        } else {
            None
        },
    })
}

/// Re-render the form with the submitted values and an error banner.
fn form_with_error(
    session: &Session,
    state: &AppState,
    id: Option<&CustomerId>,
    form: &CustomerForm,
    message: String,
) -> CustomerFormTemplate {
    let (heading, submit_label, action) = match id {
        Some(id) => ("Edit Customer", "Save Changes", format!("/customers/{id}")),
        None => ("Add Customer", "Add Customer", "/customers".to_string()),
    };

    CustomerFormTemplate {
        admin: AdminUserView::from(session),
        current_path: "/customers",
        pending_reviews: state.reviews().pending_count(),
        heading,
        submit_label,
        action,
        show_password: id.is_none(),
        form: CustomerFormView::from_form(form),
        error: Some(message),
    }
}
