use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt::time, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use relay_ecs::prelude::*;
use std::error::Error;

fn init_logging() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_ansi(true).with_timer(time::uptime()))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env()?
                .add_directive("relay_ecs=debug".parse()?),
        )
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = EcsConfig::from_toml_str("tick_rate = 10.0\nlimit_tick_rate = true")?;
    let mut ecs = EcsContext::with_config(config)?;
    let e = ecs.entity(None);

    ecs.component("position", ComponentData::new().with("x", 0).with("y", 0));
    ecs.component("nameable", ComponentData::new().with("name", ""));

    ecs.add_components(
        &e,
        &["position", "nameable"],
        &[
            ComponentData::new().with("x", 1).with("y", 2),
            ComponentData::new().with("name", "test"),
        ],
    )?;
    let me = ecs.entity(Some("me"));
    ecs.add_components(&me, &["position"], &[])?;

    ecs.system("position-updater", ["position"], |entity, view| {
        if let Some(position) = view.get("position") {
            tracing::info!("Updating position {position} of entity {entity}");
        }
    });

    ecs.tick();

    ecs.remove_components(&e, &["position"])?;

    ecs.tick();

    let ticks = ecs.run_ticks(5);
    tracing::info!(ticks, "done");
    Ok(())
}
