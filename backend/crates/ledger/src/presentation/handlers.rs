//! HTTP Handlers
//!
//! Every handler runs behind the auth gate and takes the `Principal`.

use std::sync::Arc;

use auth::{AuthGate, Principal};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::{CategoryId, TransactionId, UserId};

use crate::application::{CategoryService, ProfileService, TransactionService};
use crate::domain::repository::{
    CategoryRepository, ProfileRepository, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::TransactionType;
use crate::error::LedgerResult;
use crate::presentation::dto::{
    CategoriesBody, CategoryBody, CategoryResponse, CreateCategoryRequest, CreateProfileRequest,
    CreateTransactionRequest, DateRangeQuery, MessageBody, ProfileBody, ProfileResponse,
    ProfilesBody, TransactionBody, TransactionResponse, TransactionsBody, UpdateCategoryRequest,
    UpdateTransactionRequest,
};

/// Shared state for ledger handlers
pub struct LedgerAppState<R> {
    pub repo: Arc<R>,
    pub gate: AuthGate,
}

impl<R> Clone for LedgerAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<R> LedgerAppState<R> {
    pub fn new(repo: Arc<R>, gate: AuthGate) -> Self {
        Self { repo, gate }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// POST /api/profile
pub async fn create_profile<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Json(req): Json<CreateProfileRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let profile = ProfileService::new(state.repo.clone())
        .create(principal.user_id(), req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileBody {
            message: "Profile created successfully",
            profile: ProfileResponse::from(&profile),
        }),
    ))
}

/// GET /api/profile/user/{userId}
pub async fn list_profiles<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(user_id): Path<UserId>,
) -> LedgerResult<Json<ProfilesBody>>
where
    R: ProfileRepository + Send + Sync + 'static,
{
    let profiles = ProfileService::new(state.repo.clone())
        .list(principal.user_id(), user_id)
        .await?;

    Ok(Json(ProfilesBody {
        message: "Profiles fetched successfully",
        profiles: profiles.iter().map(ProfileResponse::from).collect(),
    }))
}

// ============================================================================
// Categories
// ============================================================================

/// POST /api/category
pub async fn create_category<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Json(req): Json<CreateCategoryRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    let category = CategoryService::new(state.repo.clone())
        .create(principal.user_id(), req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryBody {
            message: "Category created successfully",
            category: CategoryResponse::from(&category),
        }),
    ))
}

/// GET /api/category/{id}
pub async fn get_category<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(category_id): Path<CategoryId>,
) -> LedgerResult<Json<CategoryBody>>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    let category = CategoryService::new(state.repo.clone())
        .get(principal.user_id(), category_id)
        .await?;

    Ok(Json(CategoryBody {
        message: "Category fetched successfully",
        category: CategoryResponse::from(&category),
    }))
}

/// GET /api/category/user/{userId}
pub async fn list_categories<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(user_id): Path<UserId>,
) -> LedgerResult<Json<CategoriesBody>>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    let categories = CategoryService::new(state.repo.clone())
        .list(principal.user_id(), user_id)
        .await?;

    Ok(Json(CategoriesBody {
        message: "Categories fetched successfully",
        categories: categories.iter().map(CategoryResponse::from).collect(),
    }))
}

/// PUT /api/category/{id}
pub async fn update_category<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(category_id): Path<CategoryId>,
    Json(req): Json<UpdateCategoryRequest>,
) -> LedgerResult<Json<CategoryBody>>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    let category = CategoryService::new(state.repo.clone())
        .update(principal.user_id(), category_id, req.into())
        .await?;

    Ok(Json(CategoryBody {
        message: "Category updated successfully",
        category: CategoryResponse::from(&category),
    }))
}

/// DELETE /api/category/{id}
pub async fn delete_category<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(category_id): Path<CategoryId>,
) -> LedgerResult<Json<MessageBody>>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    CategoryService::new(state.repo.clone())
        .delete(principal.user_id(), category_id)
        .await?;

    Ok(Json(MessageBody {
        message: "Category deleted successfully",
    }))
}

// ============================================================================
// Transactions
// ============================================================================

/// POST /api/transaction
pub async fn create_transaction<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Json(req): Json<CreateTransactionRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let transaction = TransactionService::new(state.repo.clone())
        .create(principal.user_id(), req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionBody {
            message: "Transaction created successfully",
            transaction: TransactionResponse::from(&transaction),
        }),
    ))
}

/// GET /api/transaction/{id}
pub async fn get_transaction<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
) -> LedgerResult<Json<TransactionBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let transaction = TransactionService::new(state.repo.clone())
        .get(principal.user_id(), transaction_id)
        .await?;

    Ok(Json(TransactionBody {
        message: "Transaction fetched successfully",
        transaction: TransactionResponse::from(&transaction),
    }))
}

async fn list_matching<R>(
    state: &LedgerAppState<R>,
    principal: &Principal,
    filter: TransactionFilter,
) -> LedgerResult<Json<TransactionsBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let transactions = TransactionService::new(state.repo.clone())
        .list(principal.user_id(), filter)
        .await?;

    Ok(Json(TransactionsBody {
        message: "Transactions fetched successfully",
        transactions: transactions.iter().map(TransactionResponse::from).collect(),
    }))
}

/// GET /api/transaction/user/{userId}
pub async fn list_transactions<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(user_id): Path<UserId>,
) -> LedgerResult<Json<TransactionsBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    list_matching(&state, &principal, TransactionFilter::for_user(user_id)).await
}

/// GET /api/transaction/user/{userId}/category/{categoryId}
pub async fn list_transactions_by_category<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
) -> LedgerResult<Json<TransactionsBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let filter = TransactionFilter::for_user(user_id).category(category_id);
    list_matching(&state, &principal, filter).await
}

/// GET /api/transaction/user/{userId}/type/{type}
pub async fn list_transactions_by_type<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path((user_id, kind)): Path<(UserId, TransactionType)>,
) -> LedgerResult<Json<TransactionsBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let filter = TransactionFilter::for_user(user_id).kind(kind);
    list_matching(&state, &principal, filter).await
}

/// GET /api/transaction/user/date-range
pub async fn list_transactions_in_range<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Query(range): Query<DateRangeQuery>,
) -> LedgerResult<Json<TransactionsBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let filter =
        TransactionFilter::for_user(range.user_id).between(range.start_date, range.end_date);
    list_matching(&state, &principal, filter).await
}

/// PUT /api/transaction/{id}
pub async fn update_transaction<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
    Json(req): Json<UpdateTransactionRequest>,
) -> LedgerResult<Json<TransactionBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    let transaction = TransactionService::new(state.repo.clone())
        .update(principal.user_id(), transaction_id, req.into())
        .await?;

    Ok(Json(TransactionBody {
        message: "Transaction updated successfully",
        transaction: TransactionResponse::from(&transaction),
    }))
}

/// DELETE /api/transaction/{id}
pub async fn delete_transaction<R>(
    State(state): State<LedgerAppState<R>>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
) -> LedgerResult<Json<MessageBody>>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync + 'static,
{
    TransactionService::new(state.repo.clone())
        .delete(principal.user_id(), transaction_id)
        .await?;

    Ok(Json(MessageBody {
        message: "Transaction deleted successfully",
    }))
}
