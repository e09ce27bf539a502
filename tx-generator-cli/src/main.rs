use std::error::Error;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use env_logger::{Env, Target};
use log::error;
use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;

use tx_generator::amqp::AmqpBroker;
use tx_generator::config::ProducerConfig;
use tx_generator::error::ProducerError;
use tx_generator::producer::run;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of transactions to send; missing, zero or negative sends the default of 100
    #[clap(long, allow_hyphen_values = true)]
    pub(crate) max: Option<i64>,
}

/// The first signal asks the loop to stop after the message in flight; a second one
/// terminates right away.
fn register_stop_flag() -> Result<Arc<AtomicBool>, ProducerError> {
    let stop = Arc::new(AtomicBool::new(false));
    for &signal in TERM_SIGNALS {
        flag::register_conditional_shutdown(signal, 1, Arc::clone(&stop))?;
        flag::register(signal, Arc::clone(&stop))?;
    }
    Ok(stop)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();
    let cli = Cli::parse();

    let config = ProducerConfig::with_max_messages(cli.max);
    let stop = register_stop_flag()?;
    let mut rng = rand::thread_rng();

    if let Err(e) = run(&AmqpBroker, &config, &mut rng, &stop) {
        error!("Producer failed: {}", e);
        process::exit(1);
    }

    Ok(())
}
