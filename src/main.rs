mod config;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::time::Duration;

use anyhow::Context;
use futures::StreamExt;

use crate::config::AppConfig;
use crate::domain::event::EventCreated;
use crate::repository::postgres::{
    PostgresClubRepository, PostgresDeviceTokenRepository, PostgresNotificationRepository,
    create_pool,
};
use crate::usecase::fcm::FcmClient;
use crate::usecase::notify::EventCreatedNotifier;

type Notifier = EventCreatedNotifier<
    PostgresClubRepository,
    PostgresDeviceTokenRepository,
    FcmClient,
    PostgresNotificationRepository,
>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_subscriber();
    tracing::info!("starting club-notifier");

    let config = AppConfig::from_env();
    tracing::info!(
        nats_url = %config.nats_url,
        fcm_base_url = %config.fcm_base_url,
        "config loaded"
    );

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    tracing::info!("connected to database");

    sqlx::migrate!().run(&pool).await?;

    let notifier = EventCreatedNotifier::new(
        PostgresClubRepository::new(pool.clone()),
        PostgresDeviceTokenRepository::new(pool.clone()),
        FcmClient::new(config.fcm_base_url.clone(), config.fcm_server_key.clone()),
        PostgresNotificationRepository::new(pool),
    );

    let nats_client = async_nats::connect(&config.nats_url)
        .await
        .context("failed to connect to NATS")?;
    tracing::info!(nats_url = %config.nats_url, "connected to NATS");

    let jetstream = async_nats::jetstream::new(nats_client);

    let stream = jetstream
        .get_stream("EVENTS")
        .await
        .context("failed to get EVENTS stream")?;
    tracing::info!("got EVENTS stream");

    let consumer = stream
        .get_or_create_consumer(
            "club-notifier",
            async_nats::jetstream::consumer::pull::Config {
                durable_name: Some("club-notifier".to_string()),
                ack_wait: Duration::from_secs(120),
                max_deliver: 3,
                ..Default::default()
            },
        )
        .await
        .context("failed to create consumer")?;
    tracing::info!("consumer ready, starting message loop");

    loop {
        let mut messages = match consumer.fetch().max_messages(16).messages().await {
            Ok(msgs) => msgs,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch messages");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        while let Some(msg_result) = messages.next().await {
            match msg_result {
                Ok(msg) => {
                    if let Err(e) = handle_message(&msg, &notifier).await {
                        // Not acked: NATS redelivers, the keyed notification
                        // record keeps redelivery idempotent.
                        tracing::error!(error = %e, "failed to process message");
                    } else if let Err(e) = msg.ack().await {
                        tracing::error!(error = %e, "failed to ack message");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "error receiving message");
                }
            }
        }

        // Small delay between fetch batches
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

async fn handle_message(
    msg: &async_nats::jetstream::message::Message,
    notifier: &Notifier,
) -> anyhow::Result<()> {
    let trigger: EventCreated = match serde_json::from_slice(&msg.payload) {
        Ok(trigger) => trigger,
        Err(e) => {
            // Poison message: retrying a payload that will never parse is
            // pointless, so treat it as handled and let it be acked.
            tracing::error!(error = %e, "failed to deserialize event-created message, dropping");
            return Ok(());
        }
    };

    tracing::info!(event_id = %trigger.event_id, "processing event-created trigger");

    notifier
        .handle_event_created(&trigger.event_id, &trigger.event)
        .await
        .context("notifier invocation failed")?;

    Ok(())
}
