// Control loop at LOOP_HZ
//
// Polls the command link through the controller and publishes whatever the
// controller decides: motor duties, display directives and a health status.
// The PWM hardware and the OLED renderer subscribe to those topics.

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::config::{
    Args, TransportKind, LOOP_HZ, TOPIC_HEALTH, TOPIC_RT_DISPLAY, TOPIC_RT_MOTORS,
};
use crate::controller::{Controller, ControllerConfig};
use crate::motor::{MotorOutputs, SpeedConfig};
use crate::transport::{SerialTransport, Transport, ZenohTransport};

pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers...");
    let pub_motors = session.declare_publisher(TOPIC_RT_MOTORS).await?;
    let pub_display = session.declare_publisher(TOPIC_RT_DISPLAY).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut transport: Box<dyn Transport> = match args.transport {
        TransportKind::Serial => {
            info!("Command link: serial {} @ {}", args.port, args.baud);
            Box::new(SerialTransport::new(&args.port, args.baud))
        }
        TransportKind::Zenoh => Box::new(ZenohTransport::open(&session).await?),
    };

    let config = ControllerConfig {
        speeds: SpeedConfig::default(),
        compensation: args.compensation,
        command_timeout: Duration::from_millis(args.timeout_ms),
    };
    let mut controller = Controller::new(config, Instant::now());
    let mut ticker = interval(Duration::from_millis(1000 / LOOP_HZ));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout, compensation {}",
        LOOP_HZ, args.timeout_ms, args.compensation
    );
    info!(
        "Publishing to: {}, {}, {}",
        TOPIC_RT_MOTORS, TOPIC_RT_DISPLAY, TOPIC_HEALTH
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("Shutting down, stopping motors");
                pub_motors.put(serde_json::to_string(&MotorOutputs::zero())?).await?;
                return Ok(());
            }
        }

        let tick = controller.tick(Instant::now(), transport.as_mut());

        if let Some(motors) = tick.motors {
            pub_motors.put(serde_json::to_string(&motors)?).await?;
        }
        if let Some(directive) = tick.display {
            pub_display.put(serde_json::to_string(&directive)?).await?;
        }

        let health_json = serde_json::to_string(&controller.status())?;
        pub_health.put(health_json).await?;
    }
}
