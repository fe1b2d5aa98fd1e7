use tokio::net::TcpListener;

use subscriptions::startup::{get_app_state, run};
use subscriptions::{configuration, telemetry};

#[tokio::main]
async fn main() {
    let subscriber = telemetry::get_subscriber(
        "subscriptions".to_string(),
        "info".to_string(),
        std::io::stdout,
    );
    telemetry::initialize_subscriber(subscriber);

    let configuration = configuration::get_configuration().expect("Failed to read configuration");

    let listener = TcpListener::bind(format!(
        "{}:{}",
        configuration.application.host, configuration.application.port,
    ))
    .await
    .expect("Failed to bind a port for application");

    let app_state = get_app_state(&configuration).await;

    run(listener, app_state).await
}
