//! Client layer: resolves endpoints, dispatches calls per account and maps replies.

mod balance;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

pub use balance::{AccountOutcome, BalanceBook, BalanceReport};

use crate::config::{ConfigError, Endpoints, GatewaySettings, Readiness};
use crate::domain::{
    Account, AccountId, Balance, DefaultCatalog, GatewayCode, GatewayReply, GatewayRequest, Label,
    MessageCatalog, Operation, SendSms, describe,
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CabbageClient`].
///
/// Every variant renders as a message fit for showing to a user; raw gateway codes
/// are always passed through the [`MessageCatalog`] first.
pub enum CabbageError {
    /// HTTP client / transport failure (DNS, refused connection, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code with a body that carries no status code.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The reply arrived but does not start with a status code.
    #[error("{message}")]
    UnexpectedResponse {
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The gateway refused the request with a negative code.
    #[error("{message}")]
    Gateway { code: GatewayCode, message: String },

    /// A balance refresh failed for the labelled account.
    #[error("{label}: {source}")]
    Account {
        label: Label,
        #[source]
        source: Box<CabbageError>,
    },

    /// A balance refresh was asked for with no accounts to refresh.
    #[error("no accounts configured")]
    NoAccounts,

    /// The refresh lost one of its workers before it finished; no result is usable.
    #[error("balance refresh interrupted: {0}")]
    Interrupted(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone)]
/// Builder for [`CabbageClient`].
pub struct CabbageClientBuilder {
    settings: GatewaySettings,
    catalog: Arc<dyn MessageCatalog>,
    balances: Arc<BalanceBook>,
}

impl CabbageClientBuilder {
    /// Create a builder with default settings and the default message catalog.
    pub fn new() -> Self {
        Self {
            settings: GatewaySettings::default(),
            catalog: Arc::new(DefaultCatalog::default()),
            balances: Arc::new(BalanceBook::new()),
        }
    }

    /// Replace all settings at once.
    pub fn settings(mut self, settings: GatewaySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Mark the connector as switched on.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }

    /// Send every request to `url` instead of the public gateway hosts.
    pub fn custom_url(mut self, url: impl Into<String>) -> Self {
        self.settings.use_default_url = false;
        self.settings.custom_url = Some(url.into());
        self
    }

    /// Budget for connecting and reading the whole reply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Texts used for gateway failures.
    pub fn catalog(mut self, catalog: impl MessageCatalog + 'static) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Share a balance book, e.g. one restored from an earlier session.
    pub fn balances(mut self, balances: Arc<BalanceBook>) -> Self {
        self.balances = balances;
        self
    }

    /// Build a [`CabbageClient`].
    pub fn build(self) -> Result<CabbageClient, CabbageError> {
        let timeout = self.settings.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(self.settings.user_agent.clone())
            .build()
            .map_err(|err| CabbageError::Transport(Box::new(err)))?;

        Ok(CabbageClient {
            settings: Arc::new(self.settings),
            catalog: self.catalog,
            balances: self.balances,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

impl Default for CabbageClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
/// Gateway client serving any number of accounts.
///
/// Sends go through one account at a time; balance refreshes query every account in
/// parallel. Successful replies update the shared [`BalanceBook`].
pub struct CabbageClient {
    settings: Arc<GatewaySettings>,
    catalog: Arc<dyn MessageCatalog>,
    balances: Arc<BalanceBook>,
    http: Arc<dyn HttpTransport>,
}

impl CabbageClient {
    /// Start building a client with custom settings.
    pub fn builder() -> CabbageClientBuilder {
        CabbageClientBuilder::new()
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Last known balances of all accounts.
    pub fn balances(&self) -> &BalanceBook {
        &self.balances
    }

    pub fn readiness(&self, accounts: &[Account]) -> Readiness {
        self.settings.readiness(accounts.len())
    }

    /// Send a message through `account`.
    ///
    /// The gateway acknowledges with the remaining balance, which is recorded as well.
    ///
    /// Errors:
    /// - [`CabbageError::Config`] when no gateway URL can be resolved,
    /// - [`CabbageError::Transport`] / [`CabbageError::HttpStatus`] for network failures,
    /// - [`CabbageError::Gateway`] when the gateway refuses the message.
    pub async fn send(&self, account: &Account, request: &SendSms) -> Result<Balance, CabbageError> {
        let endpoints = self.settings.endpoints()?;
        let params = crate::transport::encode_send_form(&self.settings.fields, account, request);
        let request = gateway_request(&endpoints, account, Operation::Send, params);
        self.execute(account, request).await
    }

    /// Query the balance of one account.
    pub async fn query_balance(&self, account: &Account) -> Result<Balance, CabbageError> {
        let endpoints = self.settings.endpoints()?;
        let request = self.balance_request(&endpoints, account);
        self.execute(account, request).await
    }

    /// Query the balance of every account concurrently, one task per account.
    ///
    /// All queries run to completion before this returns; the report keeps the order
    /// of `accounts` no matter which reply arrived first. Accounts that fail keep their
    /// previous balance in the [`BalanceBook`].
    ///
    /// Errors are only returned when no query could be made
    /// ([`CabbageError::NoAccounts`], [`CabbageError::Config`]) or when a worker was lost
    /// ([`CabbageError::Interrupted`]); per-account failures live in the report.
    pub async fn refresh_balances(
        &self,
        accounts: &[Account],
    ) -> Result<BalanceReport, CabbageError> {
        if accounts.is_empty() {
            return Err(CabbageError::NoAccounts);
        }
        let endpoints = self.settings.endpoints()?;
        tracing::info!(accounts = accounts.len(), "refreshing balances");

        // Dropping a handle detaches its task, so in-flight queries always finish.
        let handles = accounts
            .iter()
            .map(|account| {
                let client = self.clone();
                let account = account.clone();
                let request = client.balance_request(&endpoints, &account);
                tokio::spawn(async move { client.execute(&account, request).await })
            })
            .collect::<Vec<_>>();

        let mut outcomes = Vec::with_capacity(accounts.len());
        for (account, handle) in accounts.iter().zip(handles) {
            let result = handle.await.map_err(CabbageError::Interrupted)?;
            if let Err(err) = &result {
                tracing::warn!(account = %account.id, error = %err, "balance query failed");
            }
            outcomes.push(AccountOutcome {
                id: account.id,
                label: account.label.clone(),
                result,
            });
        }

        let report = BalanceReport::new(outcomes);
        tracing::info!(
            failed = report.outcomes().iter().filter(|it| it.result.is_err()).count(),
            "balance refresh finished"
        );
        Ok(report)
    }

    /// Refresh every account and fail with the first failed account, labelled.
    ///
    /// Balances of healthy accounts are recorded even when this returns an error.
    pub async fn update_all_balances(
        &self,
        accounts: &[Account],
    ) -> Result<Vec<(AccountId, Balance)>, CabbageError> {
        self.refresh_balances(accounts).await?.into_result()
    }

    fn balance_request(&self, endpoints: &Endpoints, account: &Account) -> GatewayRequest {
        let params = crate::transport::encode_balance_form(&self.settings.fields, account);
        gateway_request(endpoints, account, Operation::BalanceQuery, params)
    }

    async fn execute(
        &self,
        account: &Account,
        request: GatewayRequest,
    ) -> Result<Balance, CabbageError> {
        tracing::debug!(
            account = %account.id,
            operation = ?request.operation,
            url = %request.url,
            "calling gateway"
        );

        let response = self
            .http
            .post_form(request.url.as_str(), request.params)
            .await
            .map_err(CabbageError::Transport)?;

        tracing::debug!(
            account = %account.id,
            status = response.status,
            body = %response.body,
            "received reply"
        );

        let decoded = crate::transport::decode_reply(&response.body);
        let reply = match decoded {
            Ok(reply) => reply,
            Err(_) if !(200..=299).contains(&response.status) => {
                let body = if response.body.trim().is_empty() {
                    None
                } else {
                    Some(response.body)
                };
                return Err(CabbageError::HttpStatus {
                    status: response.status,
                    body,
                });
            }
            Err(err) => {
                return Err(CabbageError::UnexpectedResponse {
                    message: self.catalog.unexpected_response(),
                    source: Box::new(err),
                });
            }
        };

        match reply {
            GatewayReply::Accepted(balance) => {
                self.balances.record(account.id, balance);
                Ok(balance)
            }
            GatewayReply::Rejected(code) => Err(CabbageError::Gateway {
                code,
                message: describe(self.catalog.as_ref(), code),
            }),
        }
    }
}

fn gateway_request(
    endpoints: &Endpoints,
    account: &Account,
    operation: Operation,
    params: Vec<(String, String)>,
) -> GatewayRequest {
    GatewayRequest {
        operation,
        url: endpoints.for_provider(&account.provider).clone(),
        params,
    }
}
