use std::sync::Arc;

use modflow_reporting::clients::{HttpClassifier, HttpPlatform, WebhookModChannels};
use modflow_reporting::collaborators::Collaborators;
use modflow_reporting::config::AppConfig;
use modflow_reporting::dispatch::RouterHandle;
use modflow_reporting::events::AmqpEscalation;
use modflow_reporting::notifier::UserNotifier;
use modflow_reporting::AppState;
use modflow_shared::clients::rabbitmq::RabbitMQClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    modflow_shared::middleware::init_tracing("modflow-reporting");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = modflow_shared::middleware::init_metrics()?;
    modflow_reporting::describe_metrics();
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url, "modflow-reporting").await?;

    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()?;

    let platform = Arc::new(HttpPlatform::new(
        http_client.clone(),
        &config.platform_api_url,
        &config.platform_token,
    ));
    let mod_channels = WebhookModChannels::new(http_client.clone(), config.mod_channel_webhooks());
    tracing::info!(guilds = mod_channels.guild_count(), "moderator channels configured");

    let collaborators = Collaborators {
        platform: platform.clone(),
        classifier: Arc::new(HttpClassifier::new(http_client, &config.classifier_url)),
        mod_channels: Arc::new(mod_channels),
        escalation: Arc::new(AmqpEscalation::new(rabbitmq.clone())),
    };

    let state = Arc::new(AppState {
        router: RouterHandle::spawn(collaborators, config.session_inbox_capacity),
        notifier: UserNotifier::new(platform),
        rabbitmq: Some(rabbitmq),
        metrics_handle: Some(metrics_handle),
    });

    let app = modflow_reporting::app(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "modflow-reporting starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
