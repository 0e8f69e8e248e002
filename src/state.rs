use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::config::Config;
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::services::{
    AuthService, NotifierService, SeaOrmAuthService, SeaOrmVisitService, VisitService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub event_bus: broadcast::Sender<NotificationEvent>,

    pub auth_service: Arc<dyn AuthService>,

    pub visit_service: Arc<dyn VisitService>,

    pub notifier: Arc<NotifierService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            event_bus.clone(),
        )) as Arc<dyn AuthService>;

        let visit_service = Arc::new(SeaOrmVisitService::new(
            store.clone(),
            config.codes.clone(),
            event_bus.clone(),
        )) as Arc<dyn VisitService>;

        let notifier = Arc::new(NotifierService::new(
            store.clone(),
            config.notifications.clone(),
            event_bus.clone(),
        )?);
        notifier.clone().start_listener();

        let config_arc = Arc::new(RwLock::new(config));

        Ok(Self {
            config: config_arc,
            store,
            event_bus,
            auth_service,
            visit_service,
            notifier,
        })
    }
}
