use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use vat_rates::utils::logger;
use vat_rates::{rates_for_country, resolve, tax_for_country, JsonFileRepository};

#[derive(Parser)]
#[command(name = "vat-lookup")]
#[command(about = "Look up a stored VAT rate for a country")]
struct Args {
    /// Two-letter country code, case-insensitive
    country: String,

    /// Reduced rate category, e.g. "books". Unknown names fall back to the standard rate
    #[arg(short, long)]
    rate: Option<String>,

    /// Apply the rate to this amount
    #[arg(long)]
    amount: Option<Decimal>,

    /// Treat --amount as gross (tax included)
    #[arg(long, requires = "amount")]
    keep_gross: bool,

    /// Print every stored rate for the country as JSON
    #[arg(long, conflicts_with_all = ["rate", "amount"])]
    all: bool,

    #[arg(long, env = "VAT_RATES_STORE", default_value = "./vat_rates.json")]
    store_path: String,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let repository = JsonFileRepository::new(&args.store_path);
    let rate_name = args.rate.as_deref();

    if args.all {
        match rates_for_country(&repository, &args.country)? {
            Some(rates) => println!("{}", serde_json::to_string_pretty(&rates)?),
            None => println!("No VAT rates stored for {}", args.country),
        }
        return Ok(());
    }

    if let Some(amount) = args.amount {
        let taxed = tax_for_country(&repository, &args.country, rate_name, amount, args.keep_gross)
            .with_context(|| format!("reading {}", args.store_path))?;
        match taxed {
            Some(t) => println!("net {}  tax {}  gross {}", t.net, t.tax, t.gross),
            None => println!("No VAT rate stored for {}", args.country),
        }
        return Ok(());
    }

    match resolve(&repository, &args.country, rate_name)
        .with_context(|| format!("reading {}", args.store_path))?
    {
        Some(rate) => println!("{}", rate),
        None => println!("No VAT rate stored for {}", args.country),
    }
    Ok(())
}
