use clap::Parser;
use delaycast_core::InputSchema;
use delaycast_service::ModelSelection;

#[derive(Parser, Debug)]
#[command(name = "delaycast")]
#[command(author, version, about = "Flight delay model serving API", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DELAYCAST_CONFIG", default_value = "delaycast.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long, env = "DELAYCAST_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "DELAYCAST_PORT")]
    pub port: Option<u16>,

    /// Input schema accepted by /model/predict (flight or fleet)
    #[arg(short, long, env = "DELAYCAST_SCHEMA")]
    pub schema: Option<InputSchema>,

    /// Which stored model serves predictions (latest or first)
    #[arg(long, env = "DELAYCAST_MODEL_SELECTION")]
    pub model_selection: Option<ModelSelection>,

    /// Model file to load at startup
    #[arg(short, long, env = "DELAYCAST_MODEL")]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
