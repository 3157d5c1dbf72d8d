use std::env;
use std::path::Path;

use tokio_stream::StreamExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use growth_eng::Session;
use growth_eng::config::Config;
use growth_eng::store::{RowStore, SupabaseStore};

#[tokio::main]
async fn main() {
    let mut args = env::args().skip(1);
    let config_path = args
        .next()
        .expect("usage: growth-eng <config.toml> <user-id>");
    let user_id = args
        .next()
        .expect("usage: growth-eng <config.toml> <user-id>");

    let config = Config::load(Path::new(&config_path)).expect("failed to load config");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.logging.level.parse().expect("invalid log level")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = SupabaseStore::new(&config.store).expect("invalid store configuration");

    let user = match store.fetch_user(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            error!(user = %user_id, "user not found");
            std::process::exit(1);
        }
        Err(err) => {
            error!(reason = %err, "failed to fetch user");
            std::process::exit(1);
        }
    };

    if !user.investment.is_accruing() {
        info!(user = %user_id, "no valid active investment, nothing to run");
        return;
    }

    let session = Session::spawn(store, user, config.engine.timing());

    let mut updates = session.update_stream();
    tokio::spawn(async move {
        while let Some(snapshot) = updates.next().await {
            info!(
                profit = %snapshot.profit,
                value = %snapshot.investment_value,
                withdrawable = %snapshot.withdrawable,
                "investment snapshot"
            );
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            session.shutdown();
        }
        _ = session.finished() => {}
    }

    let user = session.join().await;
    info!(
        user = %user.id,
        profit = %user.investment.profit,
        completed = user.investment.completed,
        "session ended"
    );
}
