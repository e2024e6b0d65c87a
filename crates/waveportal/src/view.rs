use crate::{
    Action, ContractConnector, ContractHandle, NewWaveEvent, NewWaveStream, Notice, ViewState,
    WaveContract, WaveError, WavePortalConnector, WaveRecord,
};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use waveportal_config::Config;
use waveportal_wallets::{RpcWallet, WalletProvider};

/// Static settings of a [`WaveView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSettings {
    /// Gas limit ceiling for `wave` transactions.
    pub gas_limit: u64,
    /// Messages with fewer characters are rejected without sending.
    pub min_message_len: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            gas_limit: Config::DEFAULT_GAS_LIMIT,
            min_message_len: Config::DEFAULT_MIN_MESSAGE_LEN,
        }
    }
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self { gas_limit: config.gas_limit, min_message_len: config.min_message_len }
    }
}

/// Result of [`WaveView::connect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(Address),
    ProviderAbsent,
    /// Rejected, failed or returned no account. Details are logged.
    Failed,
}

/// Result of [`WaveView::submit_wave`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The wave was included in a block.
    Mined(TxHash),
    /// Nothing was sent.
    RejectedTooShort { len: usize, min: usize },
    ProviderAbsent,
    /// Sending or confirming failed.
    Failed(String),
}

/// The wallet side of a view.
#[derive(Debug)]
struct Injected {
    wallet: Arc<dyn WalletProvider>,
    contracts: ContractHandle,
}

#[derive(Debug)]
struct Task {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Task {
    async fn stop(self) {
        self.token.cancel();
        self.handle.abort();
        let _ = self.handle.await;
    }
}

#[derive(Debug)]
struct Inner {
    injected: Option<Injected>,
    settings: ViewSettings,
    state: watch::Sender<ViewState>,
    /// Set while mounted.
    lifetime: Mutex<Option<CancellationToken>>,
    subscription: Mutex<Option<Task>>,
    account_watcher: Mutex<Option<Task>>,
}

/// The WavePortal page controller.
///
/// Owns the [`ViewState`] and applies every change to it through [`Action`]s, so concurrent
/// chains (a submit awaiting confirmation, an incoming event, an account switch) are serialized.
/// Renderers follow the state through [`WaveView::subscribe`].
///
/// State writes only happen while mounted: anything still in flight after
/// [`unmount`](Self::unmount) completes without touching the state.
#[derive(Clone, Debug)]
pub struct WaveView {
    inner: Arc<Inner>,
}

impl WaveView {
    /// Creates a view backed by a wallet and contract bindings signed by it.
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        contracts: Arc<dyn ContractConnector>,
        settings: ViewSettings,
    ) -> Self {
        let injected = Injected { wallet, contracts: ContractHandle::new(contracts) };
        Self::with_injected(Some(injected), settings)
    }

    /// Creates a view with no wallet provider present.
    pub fn without_wallet(settings: ViewSettings) -> Self {
        Self::with_injected(None, settings)
    }

    fn with_injected(injected: Option<Injected>, settings: ViewSettings) -> Self {
        let inner = Inner {
            injected,
            settings,
            state: watch::Sender::new(ViewState::default()),
            lifetime: Mutex::new(None),
            subscription: Mutex::new(None),
            account_watcher: Mutex::new(None),
        };
        Self { inner: Arc::new(inner) }
    }

    /// Creates a view from `config`.
    ///
    /// Without a configured RPC URL the view has no wallet provider.
    pub async fn from_config(config: &Config) -> Result<Self, WaveError> {
        let settings = ViewSettings::from(config);
        let Some(url) = config.rpc_url.as_deref().filter(|_| config.has_wallet()) else {
            debug!("no rpc url configured, running without a wallet");
            return Ok(Self::without_wallet(settings));
        };
        let wallet = RpcWallet::connect(url)
            .await?
            .with_account_poll_interval(config.account_poll_interval());
        wallet.provider().client().set_poll_interval(config.poll_interval());
        let contracts = WavePortalConnector::new(wallet.provider().clone(), config.contract);
        Ok(Self::new(Arc::new(wallet), Arc::new(contracts), settings))
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.inner.settings
    }

    /// Returns `true` if a wallet provider is present.
    pub fn has_wallet(&self) -> bool {
        self.inner.injected.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lifetime.lock().as_ref().is_some_and(|token| !token.is_cancelled())
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Follows state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Applies `action` on behalf of the current lifetime.
    fn dispatch(&self, action: Action) -> bool {
        self.dispatch_in(&self.lifetime(), action)
    }

    /// Applies `action` if `lifetime` has not ended. Returns `false` if the write was dropped.
    ///
    /// Operations capture their lifetime when they start, so a chain that outlives an unmount
    /// never writes into a later mount.
    fn dispatch_in(&self, lifetime: &CancellationToken, action: Action) -> bool {
        // unmount cancels under this lock
        let _guard = self.inner.lifetime.lock();
        if lifetime.is_cancelled() {
            trace!(?action, "lifetime ended, dropping state write");
            return false;
        }
        self.inner.state.send_modify(|state| state.apply(action));
        true
    }

    /// The current mounted lifetime, or an ended one if not mounted.
    fn lifetime(&self) -> CancellationToken {
        self.inner.lifetime.lock().clone().unwrap_or_else(|| {
            let ended = CancellationToken::new();
            ended.cancel();
            ended
        })
    }

    /// The contract binding for the active account.
    fn contract(&self) -> Option<Arc<dyn WaveContract>> {
        let injected = self.inner.injected.as_ref()?;
        Some(injected.contracts.get(self.inner.state.borrow().current_account))
    }

    /// Starts the mounted lifetime.
    ///
    /// Resets the state, adopts an already authorized account with its history and count,
    /// subscribes to `NewWave` and follows wallet account changes. Mounting a mounted view
    /// remounts it.
    pub async fn mount(&self) {
        if self.is_mounted() {
            self.unmount().await;
        }
        let token = CancellationToken::new();
        *self.inner.lifetime.lock() = Some(token.clone());
        self.inner.state.send_replace(ViewState::default());
        info!(wallet = self.has_wallet(), "mounting wave view");

        self.authorize_in(&token).await;
        if self.inner.injected.is_some() {
            self.subscribe_new_waves(&token).await;
            self.watch_accounts(&token);
        }
    }

    /// Ends the mounted lifetime: removes the `NewWave` listener, stops following account
    /// changes and drops every later state write.
    pub async fn unmount(&self) {
        {
            let mut lifetime = self.inner.lifetime.lock();
            let Some(token) = lifetime.take() else { return };
            token.cancel();
        }
        let watcher = self.inner.account_watcher.lock().take();
        let subscription = self.inner.subscription.lock().take();
        for task in [watcher, subscription].into_iter().flatten() {
            task.stop().await;
        }
        info!("unmounted wave view");
    }

    /// Adopts an already authorized account, without prompting, and loads its history and the
    /// total count.
    ///
    /// Failures are logged. A failure after the account is adopted leaves the history empty.
    pub async fn check_authorization(&self) {
        self.authorize_in(&self.lifetime()).await
    }

    async fn authorize_in(&self, lifetime: &CancellationToken) {
        let Some(injected) = &self.inner.injected else {
            debug!("no wallet provider found, make sure you have a wallet");
            return;
        };
        let accounts = match injected.wallet.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(%err, "failed to check wallet authorization");
                return;
            }
        };
        let Some(&account) = accounts.first() else {
            info!("no authorized account found");
            return;
        };
        info!(%account, "found an authorized account");
        self.adopt_account(lifetime, Some(account)).await;
        self.load_account_data(lifetime).await;
    }

    /// Requests account access from the wallet.
    ///
    /// On success adopts the first account and refreshes the total count. Without a wallet
    /// provider this only raises [`Notice::InstallWallet`].
    pub async fn connect(&self) -> ConnectOutcome {
        let lifetime = self.lifetime();
        let Some(injected) = &self.inner.injected else {
            warn!("no wallet provider found, get a wallet");
            self.dispatch_in(&lifetime, Action::Notice(Notice::InstallWallet));
            return ConnectOutcome::ProviderAbsent;
        };
        let accounts = match injected.wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                error!(%err, "failed to connect wallet");
                return ConnectOutcome::Failed;
            }
        };
        let Some(&account) = accounts.first() else {
            warn!("wallet granted no accounts");
            return ConnectOutcome::Failed;
        };
        info!(%account, "connected");
        self.adopt_account(&lifetime, Some(account)).await;
        if let Some(contract) = self.contract()
            && let Err(err) = self.refresh_total(&lifetime, contract.as_ref()).await
        {
            warn!(%err, "failed to fetch total waves");
        }
        ConnectOutcome::Connected(account)
    }

    /// Sets the message typed into the form.
    pub fn set_pending_message(&self, message: impl Into<String>) {
        self.dispatch(Action::PendingMessage(message.into()));
    }

    /// Clears the notice line.
    pub fn dismiss_notice(&self) {
        self.dispatch(Action::DismissNotice);
    }

    /// Sends a wave and waits for it to be mined.
    ///
    /// Messages shorter than [`ViewSettings::min_message_len`] characters are rejected without
    /// sending. The pending message is cleared as soon as the transaction is submitted and the
    /// view stays submitting until the transaction is confirmed or anything fails.
    pub async fn submit_wave(&self, message: &str) -> SubmitOutcome {
        let len = message.chars().count();
        let min = self.inner.settings.min_message_len;
        if len < min {
            info!(len, min, "wave message too short, not sending");
            return SubmitOutcome::RejectedTooShort { len, min };
        }
        let lifetime = self.lifetime();
        let Some(contract) = self.contract() else {
            warn!("no wallet provider found, get a wallet");
            self.dispatch_in(&lifetime, Action::Notice(Notice::InstallWallet));
            return SubmitOutcome::ProviderAbsent;
        };

        self.dispatch_in(&lifetime, Action::SubmitStarted);
        let result = self.send_wave(&lifetime, contract.as_ref(), message).await;
        self.dispatch_in(&lifetime, Action::SubmitSettled);

        match result {
            Ok(tx_hash) => SubmitOutcome::Mined(tx_hash),
            Err(err) => {
                error!(%err, "failed to send wave");
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    async fn send_wave(
        &self,
        lifetime: &CancellationToken,
        contract: &dyn WaveContract,
        message: &str,
    ) -> Result<TxHash, WaveError> {
        let total = self.refresh_total(lifetime, contract).await?;
        debug!(total, "retrieved total wave count");

        let pending = contract.wave(message, self.inner.settings.gas_limit).await?;
        let tx_hash = pending.tx_hash();
        info!(%tx_hash, "mining");
        self.dispatch_in(lifetime, Action::PendingMessage(String::new()));

        let tx_hash = pending.wait().await?;
        info!(%tx_hash, "mined");

        let total = self.refresh_total(lifetime, contract).await?;
        debug!(total, "retrieved total wave count");
        Ok(tx_hash)
    }

    /// Appends a wave received from a `NewWave` event.
    ///
    /// Events are appended in call order without deduplication. An event whose timestamp does
    /// not convert is dropped.
    pub fn on_new_wave_event(&self, from: Address, timestamp: U256, message: String) {
        self.record_new_wave(&self.lifetime(), from, timestamp, message);
    }

    fn record_new_wave(
        &self,
        lifetime: &CancellationToken,
        from: Address,
        timestamp: U256,
        message: String,
    ) {
        debug!(%from, %timestamp, %message, "NewWave");
        match WaveRecord::from_unix(from, timestamp, message) {
            Ok(record) => {
                self.dispatch_in(lifetime, Action::WaveReceived(record));
            }
            Err(err) => warn!(%err, "dropping NewWave event"),
        }
    }

    /// Handles an `accountsChanged` notification.
    ///
    /// A different first account replaces the active one: the history is cleared, the contract
    /// binding and `NewWave` subscription are recreated for it and, if there is an account, its
    /// history and the total count are fetched again.
    pub async fn on_accounts_changed(&self, accounts: Vec<Address>) {
        self.accounts_changed_in(&self.lifetime(), accounts).await
    }

    async fn accounts_changed_in(&self, lifetime: &CancellationToken, accounts: Vec<Address>) {
        let account = accounts.first().copied();
        if account == self.inner.state.borrow().current_account {
            return;
        }
        info!(?account, "wallet account changed");
        if !self.dispatch_in(lifetime, Action::AccountChanged(account)) {
            return;
        }
        self.dispatch_in(lifetime, Action::HistoryReset);
        self.rekey(lifetime).await;
        if account.is_some() {
            self.load_account_data(lifetime).await;
        }
    }

    async fn adopt_account(&self, lifetime: &CancellationToken, account: Option<Address>) {
        let previous = self.inner.state.borrow().current_account;
        if self.dispatch_in(lifetime, Action::AccountChanged(account)) && previous != account {
            self.rekey(lifetime).await;
        }
    }

    /// Recreates the contract binding and, if one is active, the `NewWave` subscription.
    async fn rekey(&self, lifetime: &CancellationToken) {
        let Some(injected) = &self.inner.injected else { return };
        if lifetime.is_cancelled() {
            return;
        }
        injected.contracts.invalidate();
        let subscribed = self.inner.subscription.lock().is_some();
        if subscribed {
            self.subscribe_new_waves(lifetime).await;
        }
    }

    /// Fetches the history and the total count. The count is fetched even if the history fails.
    async fn load_account_data(&self, lifetime: &CancellationToken) {
        let Some(contract) = self.contract() else { return };
        if let Err(err) = self.load_history(lifetime, contract.as_ref()).await {
            warn!(%err, "failed to fetch wave history");
        }
        if let Err(err) = self.refresh_total(lifetime, contract.as_ref()).await {
            warn!(%err, "failed to fetch total waves");
        }
    }

    async fn load_history(
        &self,
        lifetime: &CancellationToken,
        contract: &dyn WaveContract,
    ) -> Result<(), WaveError> {
        let waves = contract.all_waves().await?;
        let records = waves.into_iter().map(WaveRecord::try_from).collect::<Result<Vec<_>, _>>()?;
        debug!(waves = records.len(), "loaded wave history");
        self.dispatch_in(lifetime, Action::HistoryLoaded(records));
        Ok(())
    }

    async fn refresh_total(
        &self,
        lifetime: &CancellationToken,
        contract: &dyn WaveContract,
    ) -> Result<u64, WaveError> {
        let total = contract.total_waves().await?.saturating_to::<u64>();
        self.dispatch_in(lifetime, Action::TotalWaves(total));
        Ok(total)
    }

    /// Replaces the `NewWave` subscription with one on the current binding, tied to `lifetime`.
    async fn subscribe_new_waves(&self, lifetime: &CancellationToken) {
        if lifetime.is_cancelled() {
            return;
        }
        let previous = self.inner.subscription.lock().take();
        if let Some(previous) = previous {
            previous.stop().await;
        }
        let Some(contract) = self.contract() else { return };
        let stream = match contract.subscribe_new_waves().await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(%err, "failed to subscribe to NewWave events");
                return;
            }
        };
        let token = lifetime.child_token();
        let handle = tokio::spawn(forward_new_waves(
            Arc::downgrade(&self.inner),
            stream,
            token.clone(),
        ));
        debug!("subscribed to NewWave events");
        let stale = self.inner.subscription.lock().replace(Task { token, handle });
        if let Some(stale) = stale {
            stale.stop().await;
        }
    }

    fn watch_accounts(&self, lifetime: &CancellationToken) {
        let Some(injected) = &self.inner.injected else { return };
        let mut changes = injected.wallet.account_changes();
        let token = lifetime.child_token();
        let view = Arc::downgrade(&self.inner);
        let handle = tokio::spawn({
            let token = token.clone();
            async move {
                loop {
                    let accounts = tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        accounts = changes.next() => match accounts {
                            Some(accounts) => accounts,
                            None => break,
                        },
                    };
                    let Some(inner) = view.upgrade() else { break };
                    WaveView { inner }.accounts_changed_in(&token, accounts).await;
                }
                trace!("stopped following account changes");
            }
        });
        if let Some(previous) = self.inner.account_watcher.lock().replace(Task { token, handle }) {
            previous.token.cancel();
            previous.handle.abort();
        }
    }
}

async fn forward_new_waves(view: Weak<Inner>, mut stream: NewWaveStream, token: CancellationToken) {
    loop {
        let event = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            event = stream.next() => event,
        };
        let Some(inner) = view.upgrade() else { break };
        match event {
            Some(Ok(NewWaveEvent { from, timestamp, message })) => {
                WaveView { inner }.record_new_wave(&token, from, timestamp, message)
            }
            Some(Err(err)) => warn!(%err, "failed to decode NewWave event"),
            None => {
                debug!("NewWave subscription ended");
                break;
            }
        }
    }
}
