use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use object_storage::S3ObjectStorage;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use object_consumer::{
    event::S3Notification, types::Environment, DiscardProcessor, HandlerConfig, ObjectConsumer,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // CloudWatch adds the ingestion time, JSON lines for staging/production (Datadog)
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .without_time()
            .init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let config = HandlerConfig::from_environment(&environment);
    info!(
        "Starting object consumer in {:?} environment with {:?}",
        environment, config
    );

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let consumer = ObjectConsumer::new(
        Arc::new(S3ObjectStorage::new(s3_client)),
        Arc::new(DiscardProcessor),
        config,
    );
    let consumer = &consumer;

    run(service_fn(
        move |event: LambdaEvent<Option<S3Notification>>| async move {
            consumer
                .handle(&event.context.env_config.function_name, event.payload.as_ref())
                .await?;
            Ok::<(), Error>(())
        },
    ))
    .await
}
