// range_coder_demo/src/main.rs

use clap::{Parser, ValueEnum};
use range_coder::{
    decode, encode, pack, AdaptiveCountModel, Bits, ProbabilityModel, StaticModel, UniformModel,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Probability model used to code the input.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelKind {
    /// Fixed weights counted from the input text.
    Static,
    /// Every byte equally likely.
    Uniform,
    /// Weights adapt to the bytes already coded.
    Adaptive,
}

/// Range-codes a piece of text and decodes it again.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text to encode.
    #[arg(default_value = "BBBBBBBBBBBBCADABDKSUEEiieeeehsksJeJeJEJEeEej23122239123")]
    text: String,

    #[arg(long, value_enum, default_value_t = ModelKind::Static, env = "RANGE_CODER_MODEL")]
    model: ModelKind,

    /// Weight of the end-of-sequence terminator.
    #[arg(long, default_value_t = 1.0, env = "RANGE_CODER_TERMINATOR_WEIGHT")]
    terminator_weight: f64,

    /// Print every coded bit.
    #[arg(long)]
    show_bits: bool,
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init()
}

/// Helper function to print a bit sequence, grouped in bytes.
fn print_bits(bits: &Bits) {
    for (i, bit) in bits.iter().enumerate() {
        print!("{}", u8::from(*bit));
        if (i + 1) % 8 == 0 {
            print!(" ");
        }
    }
    println!();
}

fn round_trip<M>(input: &[u8], model: &M, show_bits: bool) -> Result<(), Box<dyn std::error::Error>>
where
    M: ProbabilityModel<Symbol = u8> + ?Sized,
{
    let encoded = encode(input, model)?;
    let (bytes, bit_count) = pack(&encoded);

    println!("Encoded Data ({} bits, {} bytes): ", bit_count, bytes.len());
    for byte in &bytes {
        print!("{:02X} ", byte);
    }
    println!();
    if show_bits {
        print_bits(&encoded);
    }
    if !input.is_empty() {
        println!(
            "Bits per symbol: {:.3}",
            bit_count as f64 / input.len() as f64
        );
    }

    let decoded = decode(&encoded, model)?;
    println!("Decoded Text: ");
    println!("{}", String::from_utf8_lossy(&decoded));

    // Verify correctness
    if decoded == input {
        println!("Decoding successful. The decoded text matches the original input.");
    } else {
        println!("Decoding failed. The decoded text does not match the original input.");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging();

    let input = args.text.as_bytes();
    println!("Original Text ({} bytes): ", input.len());
    println!("{}", args.text);

    let model: Box<dyn ProbabilityModel<Symbol = u8>> = match args.model {
        ModelKind::Static => Box::new(StaticModel::from_counts(input, args.terminator_weight)),
        ModelKind::Uniform => Box::new(UniformModel::new(args.terminator_weight)),
        ModelKind::Adaptive => Box::new(AdaptiveCountModel::bytes(args.terminator_weight)),
    };
    tracing::info!(model = ?args.model, symbols = model.symbol_count(), "model ready");

    round_trip(input, &model, args.show_bits)
}
