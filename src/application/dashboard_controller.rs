// Dashboard controller - Initial load, notification-driven refresh, export wiring
use crate::application::asset_gateway::{AssetGateway, AssetUpdated};
use crate::application::chart_renderer::ChartRenderer;
use crate::application::report_exporter::ReportExporter;
use crate::application::summary_renderer::SummaryRenderer;
use crate::domain::page::{DashboardPage, EXPORT_BUTTON_ID, PageSnapshot};
use crate::infrastructure::pdf_report::ExportError;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const COMMAND_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("export trigger is not bound ({id} element not found)", id = EXPORT_BUTTON_ID)]
    Unbound,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("dashboard controller is not running")]
    Stopped,
}

pub enum DashboardCommand {
    Export(oneshot::Sender<Result<PathBuf, TriggerError>>),
}

pub struct DashboardController {
    gateway: Arc<dyn AssetGateway>,
    page: DashboardPage,
    summary: SummaryRenderer,
    chart: ChartRenderer,
    exporter: ReportExporter,
    state: ControllerState,
    export_bound: bool,
}

impl DashboardController {
    pub fn new(gateway: Arc<dyn AssetGateway>, page: DashboardPage, exporter: ReportExporter) -> Self {
        Self {
            gateway,
            page,
            summary: SummaryRenderer,
            chart: ChartRenderer::default(),
            exporter,
            state: ControllerState::Uninitialized,
            export_bound: false,
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot::capture(
            &self.page,
            self.state == ControllerState::Ready,
            self.export_bound,
        )
    }

    /// Uninitialized -> Ready: first full refresh, then subscribe and bind
    /// the export trigger. Returns `None` when already initialized.
    pub async fn init(&mut self) -> Option<broadcast::Receiver<AssetUpdated>> {
        if self.state == ControllerState::Ready {
            return None;
        }

        self.refresh().await;
        let notifications = self.gateway.subscribe();

        self.export_bound = self.page.export_button;
        if !self.export_bound {
            tracing::debug!("{} not present, export trigger left unbound", EXPORT_BUTTON_ID);
        }

        self.state = ControllerState::Ready;
        tracing::info!("Dashboard ready");
        Some(notifications)
    }

    /// Summary and chart refresh independently; a failure in one leaves the
    /// other untouched.
    pub async fn refresh(&mut self) {
        self.update_summary().await;
        self.update_chart().await;
    }

    async fn update_summary(&mut self) {
        match self.gateway.asset_counts_by_station().await {
            Ok(counts) => self.summary.render(&counts, &mut self.page),
            Err(e) => tracing::error!("Error updating asset counts: {:#}", e),
        }
    }

    async fn update_chart(&mut self) {
        match self.gateway.asset_counts_by_station().await {
            Ok(counts) => self.chart.render(&counts, &mut self.page),
            Err(e) => tracing::error!("Error updating asset chart: {:#}", e),
        }
    }

    pub fn export(&self) -> Result<PathBuf, TriggerError> {
        if !self.export_bound {
            return Err(TriggerError::Unbound);
        }
        Ok(self.exporter.export(&self.page)?)
    }

    /// Own the page until the command channel closes. Notifications that
    /// queue up while a refresh runs are folded into one follow-up refresh.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<DashboardCommand>,
        snapshots: watch::Sender<PageSnapshot>,
    ) {
        let mut notifications = self.init().await;
        snapshots.send_replace(self.snapshot());

        loop {
            tokio::select! {
                received = next_notification(&mut notifications) => {
                    match received {
                        Ok(_) | Err(RecvError::Lagged(_)) => {
                            let coalesced = notifications.as_mut().map(drain).unwrap_or(0);
                            tracing::debug!("assetUpdated received ({} coalesced)", coalesced);
                            self.refresh().await;
                            snapshots.send_replace(self.snapshot());
                        }
                        Err(RecvError::Closed) => {
                            tracing::warn!("assetUpdated channel closed, live updates stopped");
                            notifications = None;
                        }
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(DashboardCommand::Export(reply)) => {
                            let result = self.export();
                            if let Err(e) = &result {
                                tracing::error!("Export to PDF failed: {}", e);
                            }
                            let _ = reply.send(result);
                        }
                        None => break,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
impl DashboardController {
    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn page(&self) -> &DashboardPage {
        &self.page
    }

    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }
}

async fn next_notification(
    notifications: &mut Option<broadcast::Receiver<AssetUpdated>>,
) -> Result<AssetUpdated, RecvError> {
    match notifications {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn drain(rx: &mut broadcast::Receiver<AssetUpdated>) -> usize {
    let mut drained = 0;
    loop {
        match rx.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => drained += 1,
            Err(_) => return drained,
        }
    }
}

/// Cloneable handle used by the HTTP layer
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<DashboardCommand>,
    snapshots: watch::Receiver<PageSnapshot>,
}

impl DashboardHandle {
    pub fn snapshot(&self) -> PageSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Press the export button
    pub async fn export(&self) -> Result<PathBuf, TriggerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(DashboardCommand::Export(reply))
            .await
            .map_err(|_| TriggerError::Stopped)?;
        response.await.map_err(|_| TriggerError::Stopped)?
    }
}

#[cfg(test)]
impl DashboardHandle {
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.snapshots.clone()
    }
}

/// Start the controller task and return its handle
pub fn spawn(controller: DashboardController) -> DashboardHandle {
    let (commands, command_rx) = mpsc::channel(COMMAND_CAPACITY);
    let (snapshot_tx, snapshots) = watch::channel(controller.snapshot());
    tokio::spawn(controller.run(command_rx, snapshot_tx));
    DashboardHandle {
        commands,
        snapshots,
    }
}
