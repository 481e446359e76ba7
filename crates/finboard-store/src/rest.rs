//! HTTP client for a PostgREST-style backend (`{base}/rest/v1/{table}`).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use finboard_config::StoreConfig;
use finboard_domain::{
    Account, AccountDraft, Budget, BudgetDraft, Category, CategoryDraft, DateRange, FilterSet,
    Tag, TagDraft, Transaction, TransactionDraft, YearMonth,
};

use crate::{
    query::{self, Query},
    rows::{
        NewAccount, NewBudget, NewCategory, NewTag, TagLinkPayload, TransactionPayload,
        TransactionRow,
    },
    CategorySpend, DashboardSummary, DataStore, StoreError, StoreResult,
};

const USER_AGENT: &str = concat!("finboard/", env!("CARGO_PKG_VERSION"));
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> StoreResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        Self::new(config.endpoint()?, config.key()?)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn checked(table: &'static str, response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!(table, status = status.as_u16(), "data store request rejected");
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(table: &'static str, response: Response) -> StoreResult<T> {
        response.json::<T>().await.map_err(|err| StoreError::Decode {
            entity: table,
            message: err.to_string(),
        })
    }

    async fn select<T: DeserializeOwned>(&self, table: &'static str, query: Query) -> StoreResult<Vec<T>> {
        debug!(table, "select");
        let response = self
            .request(Method::GET, table)
            .query(&query)
            .send()
            .await?;
        Self::decode(table, Self::checked(table, response).await?).await
    }

    async fn insert<B, T>(&self, table: &'static str, body: &B) -> StoreResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "insert");
        let response = self
            .request(Method::POST, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = Self::decode(table, Self::checked(table, response).await?).await?;
        rows.into_iter().next().ok_or(StoreError::EmptyResponse(table))
    }

    async fn update<B, T>(&self, table: &'static str, id: Uuid, body: &B) -> StoreResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, %id, "update");
        let response = self
            .request(Method::PATCH, table)
            .query(&query::by_id(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = Self::decode(table, Self::checked(table, response).await?).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound { entity: table, id })
    }

    async fn delete(&self, table: &'static str, query: Query) -> StoreResult<()> {
        debug!(table, "delete");
        let response = self
            .request(Method::DELETE, table)
            .query(&query)
            .send()
            .await?;
        Self::checked(table, response).await?;
        Ok(())
    }

    async fn fetch_transaction(&self, id: Uuid) -> StoreResult<Transaction> {
        let mut query = query::by_id(id);
        query.push(("select", query::TRANSACTION_SELECT.into()));
        let rows: Vec<TransactionRow> = self.select(query::TRANSACTIONS, query).await?;
        rows.into_iter()
            .next()
            .map(TransactionRow::into_transaction)
            .ok_or(StoreError::NotFound {
                entity: query::TRANSACTIONS,
                id,
            })
    }

    async fn replace_tag_links(&self, transaction_id: Uuid, tags: &[Uuid]) -> StoreResult<()> {
        self.delete(query::TRANSACTION_TAGS, query::tag_links(transaction_id))
            .await?;
        if tags.is_empty() {
            return Ok(());
        }
        let links: Vec<TagLinkPayload> = tags
            .iter()
            .map(|tag_id| TagLinkPayload {
                transaction_id,
                tag_id: *tag_id,
            })
            .collect();
        let response = self
            .request(Method::POST, query::TRANSACTION_TAGS)
            .json(&links)
            .send()
            .await?;
        Self::checked(query::TRANSACTION_TAGS, response).await?;
        Ok(())
    }

    async fn list_rows(&self, query: Query) -> StoreResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = self.select(query::TRANSACTIONS, query).await?;
        Ok(rows.into_iter().map(TransactionRow::into_transaction).collect())
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn list_accounts(&self, owner: Uuid) -> StoreResult<Vec<Account>> {
        self.select(query::ACCOUNTS, query::active_by_name(owner)).await
    }

    async fn create_account(&self, owner: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        let draft = draft.clone().validated()?;
        let body = NewAccount {
            owner_id: owner,
            draft: &draft,
            current_balance: draft.initial_balance,
        };
        self.insert(query::ACCOUNTS, &body).await
    }

    async fn update_account(&self, id: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        let draft = draft.clone().validated()?;
        self.update(query::ACCOUNTS, id, &draft).await
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        self.select(query::CATEGORIES, query::active_by_name(owner)).await
    }

    async fn create_category(&self, owner: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        draft.validate()?;
        self.insert(query::CATEGORIES, &NewCategory { owner_id: owner, draft })
            .await
    }

    async fn update_category(&self, id: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        draft.validate()?;
        self.update(query::CATEGORIES, id, draft).await
    }

    async fn list_transactions(
        &self,
        owner: Uuid,
        filters: &FilterSet,
    ) -> StoreResult<Vec<Transaction>> {
        let mut transactions = self.list_rows(query::transactions(owner, filters)).await?;
        // Tag selection is applied after the fetch; the join only embeds the links.
        if let Some(tag_id) = filters.tag_id {
            transactions.retain(|txn| txn.has_tag(tag_id));
        }
        Ok(transactions)
    }

    async fn list_transactions_between(
        &self,
        owner: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Transaction>> {
        self.list_rows(query::transactions_between(owner, range)).await
    }

    async fn create_transaction(
        &self,
        owner: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        let draft = draft.clone().validated()?;
        let payload = TransactionPayload::new(Some(owner), &draft)?;
        let row: TransactionRow = self.insert(query::TRANSACTIONS, &payload).await?;
        let id = row.id;
        if draft.tags.is_empty() {
            return Ok(row.into_transaction());
        }
        self.replace_tag_links(id, &draft.tags).await?;
        self.fetch_transaction(id).await
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        let draft = draft.clone().validated()?;
        let payload = TransactionPayload::new(None, &draft)?;
        let _: TransactionRow = self.update(query::TRANSACTIONS, id, &payload).await?;
        self.replace_tag_links(id, &draft.tags).await?;
        self.fetch_transaction(id).await
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        self.delete(query::TRANSACTIONS, query::by_id(id)).await
    }

    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>> {
        self.select(query::TAGS, query::tags(owner)).await
    }

    async fn create_tag(&self, owner: Uuid, draft: &TagDraft) -> StoreResult<Tag> {
        draft.validate()?;
        self.insert(query::TAGS, &NewTag { owner_id: owner, draft }).await
    }

    async fn delete_tag(&self, id: Uuid) -> StoreResult<()> {
        self.delete(query::TAGS, query::by_id(id)).await
    }

    async fn list_budgets(&self, owner: Uuid, period: YearMonth) -> StoreResult<Vec<Budget>> {
        self.select(query::BUDGETS, query::budgets(owner, period)).await
    }

    async fn create_budget(&self, owner: Uuid, draft: &BudgetDraft) -> StoreResult<Budget> {
        draft.validate()?;
        self.insert(query::BUDGETS, &NewBudget::new(owner, draft)).await
    }

    async fn dashboard_summary(
        &self,
        owner: Uuid,
        period: YearMonth,
        _today: NaiveDate,
    ) -> StoreResult<DashboardSummary> {
        let rows: Vec<DashboardSummary> = self
            .select(query::DASHBOARD_SUMMARY, query::dashboard(owner, period))
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn upcoming_payments(
        &self,
        owner: Uuid,
        today: NaiveDate,
        days: u32,
    ) -> StoreResult<Vec<Transaction>> {
        let mut transactions = self.list_rows(query::upcoming(owner, today, days)).await?;
        transactions.sort_by_key(Transaction::due_date);
        Ok(transactions)
    }

    async fn category_spend(
        &self,
        owner: Uuid,
        period: YearMonth,
    ) -> StoreResult<Vec<CategorySpend>> {
        self.select(query::MONTHLY_REPORT, query::category_spend(owner, period))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls_follow_rest_prefix() {
        let store = RestStore::new("https://db.example.com/", "key").unwrap();
        assert_eq!(
            store.table_url(query::ACCOUNTS),
            "https://db.example.com/rest/v1/accounts"
        );
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let err = RestStore::from_config(&StoreConfig::default()).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
