use std::sync::Arc;

use log::{debug, error, info, warn};
use meridian_clock::create_clock;
use meridian_core::OrderIdSequence;
use meridian_matching::{EngineConfig, MatchingEngine, create_match_policy};
use meridian_notify::{EventBus, LoggingSink};
use tokio::sync::mpsc::{Receiver, Sender, channel};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, ExchangeConfig};
use crate::error::{ExchangeError, Result};
use crate::model::{
    CurrencyPair, ExchangeCommand, ExchangeStats, Order, OrderRequest, SubmitOrderResponse,
};

/// Handle to communicate with a running exchange
///
/// Cheap to clone. Commands from all clones go through one queue and are
/// served in arrival order.
#[derive(Debug, Clone)]
pub struct ExchangeHandle {
    name: Arc<str>,
    sender: Sender<ExchangeCommand>,
}

impl ExchangeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit a new order and wait for it to be matched
    pub async fn submit_order(&self, request: OrderRequest) -> Result<SubmitOrderResponse> {
        let (response, rx) = oneshot::channel();
        self.send(ExchangeCommand::SubmitOrder { request, response })
            .await?;

        rx.await
            .map_err(|e| ExchangeError::ChannelReceive(e.to_string()))?
    }

    /// Resting orders selling `pair.for_sale` for `pair.desired`, best first
    pub async fn open_orders(&self, pair: CurrencyPair) -> Result<Vec<Order>> {
        let (response, rx) = oneshot::channel();
        self.send(ExchangeCommand::OpenOrders { pair, response })
            .await?;

        rx.await
            .map_err(|e| ExchangeError::ChannelReceive(e.to_string()))
    }

    pub async fn stats(&self) -> Result<ExchangeStats> {
        let (response, rx) = oneshot::channel();
        self.send(ExchangeCommand::Stats { response }).await?;

        rx.await
            .map_err(|e| ExchangeError::ChannelReceive(e.to_string()))
    }

    /// Ask the exchange to stop. Commands queued before this one are
    /// still served.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(ExchangeCommand::Shutdown).await
    }

    /// Check if the exchange task is gone
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn send(&self, command: ExchangeCommand) -> Result<()> {
        self.sender
            .send(command)
            .await
            .map_err(|e| ExchangeError::ChannelSend(e.to_string()))
    }
}

/// Exchange service that owns one matching engine
///
/// All orders go through a single command queue, so the arrival, matching
/// and book updates of one order finish before the next order is looked at.
pub struct Exchange {
    name: String,
    engine: MatchingEngine<EventBus>,
    receiver: Receiver<ExchangeCommand>,
    orders_received: u64,
    orders_rejected: u64,
}

impl Exchange {
    /// Start an exchange with an empty event bus
    pub fn spawn(config: ExchangeConfig) -> Result<(ExchangeHandle, JoinHandle<()>)> {
        Self::spawn_with_bus(config, EventBus::new())
    }

    /// Start an exchange that reports to `bus`
    ///
    /// Subscribers registered on the bus beforehand see every event,
    /// including those raised by the seed orders. The bus delivery policy is
    /// taken from the configuration.
    pub fn spawn_with_bus(
        config: ExchangeConfig,
        bus: EventBus,
    ) -> Result<(ExchangeHandle, JoinHandle<()>)> {
        let (exchange, handle) = Self::start(config, bus)?;
        let task = tokio::spawn(exchange.run());

        Ok((handle, task))
    }

    /// Build the engine and submit the seed orders without serving commands
    fn start(config: ExchangeConfig, mut bus: EventBus) -> Result<(Exchange, ExchangeHandle)> {
        config.validate()?;
        let seeds = config.seed_requests()?;

        bus.set_delivery(config.delivery);
        if config.log_events {
            bus.attach(LoggingSink::new());
        }

        let engine_config = EngineConfig {
            ids: Arc::new(OrderIdSequence::new()),
            clock: create_clock(config.clock),
            policy: create_match_policy(config.match_policy.as_str()),
        };
        let (sender, receiver) = channel(config.command_buffer_size);

        let mut exchange = Exchange {
            name: config.name.clone(),
            engine: MatchingEngine::with_config(bus, engine_config),
            receiver,
            orders_received: 0,
            orders_rejected: 0,
        };

        for (index, request) in seeds.into_iter().enumerate() {
            exchange.handle_submit_order(request).map_err(|err| match err {
                ExchangeError::Matching(matching) => {
                    warn!("Seed order #{} rejected: {}", index, matching);
                    ExchangeError::Config(ConfigError::Invalid(format!(
                        "seed order #{} rejected: {}",
                        index, matching
                    )))
                }
                other => other,
            })?;
        }

        let handle = ExchangeHandle {
            name: Arc::from(config.name.as_str()),
            sender,
        };

        Ok((exchange, handle))
    }

    /// Main event loop - processes commands sequentially
    async fn run(mut self) {
        info!(
            "Exchange '{}' started with {} open orders",
            self.name,
            self.engine.orderbook().len()
        );

        while let Some(command) = self.receiver.recv().await {
            if !self.process_command(command) {
                break;
            }
        }

        info!(
            "Exchange '{}' stopped after {} orders, {} trades",
            self.name,
            self.orders_received,
            self.engine.trades_executed()
        );
    }

    /// Process a single command, returns false if should shutdown
    fn process_command(&mut self, command: ExchangeCommand) -> bool {
        match command {
            ExchangeCommand::SubmitOrder { request, response } => {
                let result = self.handle_submit_order(request);
                return self.respond(result, response);
            }

            ExchangeCommand::OpenOrders { pair, response } => {
                let orders = self
                    .engine
                    .orderbook()
                    .orders_for(&pair.for_sale, &pair.desired)
                    .cloned()
                    .collect();
                let _ = response.send(orders);
            }

            ExchangeCommand::Stats { response } => {
                let _ = response.send(self.stats());
            }

            ExchangeCommand::Shutdown => {
                info!("Exchange '{}' shutting down", self.name);
                return false;
            }
        }

        true
    }

    /// Answer a submitter, returns false if the service must stop
    ///
    /// After an integrity failure the book can't be trusted, so nothing
    /// queued behind the failing order is matched.
    fn respond(
        &mut self,
        result: Result<SubmitOrderResponse>,
        response: oneshot::Sender<Result<SubmitOrderResponse>>,
    ) -> bool {
        let fatal = matches!(&result, Err(err) if err.is_fatal());
        let _ = response.send(result);

        if fatal {
            error!("Exchange '{}' stopping after integrity failure", self.name);
            self.receiver.close();
        }
        !fatal
    }

    fn handle_submit_order(&mut self, request: OrderRequest) -> Result<SubmitOrderResponse> {
        self.orders_received += 1;

        let result = self
            .engine
            .create_order(request)
            .and_then(|order| self.engine.submit(order));

        match result {
            Ok(submission) => {
                debug!(
                    "Order {} done with {} trades ({})",
                    submission.order.id(),
                    submission.trades.len(),
                    submission.order.status()
                );
                Ok(SubmitOrderResponse {
                    order: submission.order,
                    trades: submission.trades,
                })
            }
            Err(err) => {
                self.orders_rejected += 1;
                if err.is_fatal() {
                    error!("Integrity failure in exchange '{}': {}", self.name, err);
                } else {
                    debug!("Order rejected: {}", err);
                }
                Err(err.into())
            }
        }
    }

    fn stats(&self) -> ExchangeStats {
        ExchangeStats {
            name: self.name.clone(),
            orders_received: self.orders_received,
            orders_rejected: self.orders_rejected,
            trades_executed: self.engine.trades_executed(),
            open_orders: self.engine.orderbook().len(),
        }
    }
}
