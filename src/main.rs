use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use six_cities::api::{ApiClient, FileTokenStore, MemoryTokenStore, Offer, ReviewDraft, TokenStore};
use six_cities::core::config::{self, CliOverrides, ResolvedConfig};
use six_cities::core::selectors::{can_access_private, favorites_by_city, find_offer, near_offers};
use six_cities::core::state::CITIES;
use six_cities::core::{Action, Store, effects};

#[derive(Parser)]
#[command(name = "six-cities", about = "Browse and book rentals in six cities")]
struct Args {
    /// City to browse
    #[arg(short, long, value_parser = clap::builder::PossibleValuesParser::new(CITIES))]
    city: Option<String>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List offers in the selected city
    Offers,
    /// Show one offer with its reviews and neighbours
    Offer { id: String },
    /// List favorites grouped by city (requires sign in)
    Favorites,
    /// Add an offer to favorites, or remove it with --remove
    Favorite {
        id: String,
        #[arg(long)]
        remove: bool,
    },
    /// Sign in
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List reviews of an offer
    Reviews { id: String },
    /// Post a review (requires sign in)
    Review {
        id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
}

fn build_store(config: &ResolvedConfig) -> Result<Store, String> {
    let tokens: Arc<dyn TokenStore> = match &config.token_path {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    let api = ApiClient::new(config.base_url.clone(), config.timeout, tokens)
        .map_err(|e| e.to_string())?;
    let store = Store::new(api);
    store.dispatch(Action::ChangeCity(config.default_city.clone()));
    Ok(store)
}

fn print_offer_line(offer: &Offer) {
    let premium = if offer.is_premium { " [Premium]" } else { "" };
    let favorite = if offer.is_favorite { "★" } else { "☆" };
    println!(
        "{} {} €{}/night  {}  ({}, {}%){}",
        favorite,
        offer.id,
        offer.price,
        offer.title,
        offer.kind,
        offer.rating_percent(),
        premium
    );
}

fn print_offer_details(offer: &Offer) {
    print_offer_line(offer);
    if let Some(bedrooms) = offer.bedrooms {
        println!("  {} {}", bedrooms, if bedrooms == 1 { "Bedroom" } else { "Bedrooms" });
    }
    if let Some(adults) = offer.max_adults {
        println!("  Max {} {}", adults, if adults == 1 { "adult" } else { "adults" });
    }
    if let Some(goods) = offer.goods.as_ref().filter(|g| !g.is_empty()) {
        println!("  What's inside: {}", goods.join(", "));
    }
    if let Some(host) = &offer.host {
        let pro = if host.is_pro { " (Pro)" } else { "" };
        println!("  Host: {}{}", host.name, pro);
    }
    if let Some(description) = &offer.description {
        println!("  {}", description);
    }
}

async fn run(store: &Store, command: Command) -> Result<(), String> {
    effects::check_auth(store).await;

    match command {
        Command::Offers => {
            effects::fetch_offers(store).await;
            let view = store.view();
            if let Some(error) = view.error {
                return Err(error);
            }
            println!(
                "{} places to stay in {}",
                view.filtered_offers.len(),
                view.selected_city
            );
            for offer in view.filtered_offers.iter() {
                print_offer_line(offer);
            }
            println!("Favorites: {}", view.favorite_count);
        }
        Command::Offer { id } => {
            effects::fetch_offers(store).await;
            effects::fetch_offer(store, &id).await;
            effects::fetch_reviews(store, &id).await;

            let state = store.state();
            let Some(offer) = find_offer(&state.offers.offers, &id) else {
                return Err(format!("Offer {id} not found"));
            };
            print_offer_details(offer);

            println!("Reviews · {}", state.offers.reviews.len());
            for review in state.offers.reviews.iter() {
                println!(
                    "  {} ({}): {}",
                    review.user.name,
                    review.date.format("%B %Y"),
                    review.comment
                );
            }

            println!("Other places in the neighbourhood:");
            for near in near_offers(&state.offers.offers, &id) {
                print_offer_line(&near);
            }
        }
        Command::Favorites => {
            if !can_access_private(&store.state()) {
                return Err("Sign in to see your favorites".to_string());
            }
            effects::fetch_favorite_offers(store)
                .await
                .map_err(|e| e.to_string())?;
            let state = store.state();
            let groups = favorites_by_city(&state.offers.offers);
            if groups.is_empty() {
                println!("Nothing yet saved.");
            }
            for (city, offers) in groups {
                println!("{city}");
                for offer in &offers {
                    print_offer_line(offer);
                }
            }
        }
        Command::Favorite { id, remove } => {
            if !can_access_private(&store.state()) {
                return Err("Sign in to manage favorites".to_string());
            }
            let offer = effects::toggle_favorite(store, &id, !remove)
                .await
                .map_err(|e| e.to_string())?;
            print_offer_line(&offer);
        }
        Command::Login { email, password } => {
            let user = effects::login(store, &email, &password)
                .await
                .map_err(|e| e.user_message())?;
            println!("Signed in as {}", user.email);
        }
        Command::Logout => {
            effects::logout(store);
            println!("Signed out");
        }
        Command::Whoami => match store.state().user.user {
            Some(user) => {
                let pro = if user.is_pro { " (Pro)" } else { "" };
                println!("{} <{}>{}", user.name, user.email, pro);
            }
            None => println!("Not signed in"),
        },
        Command::Reviews { id } => {
            effects::fetch_reviews(store, &id).await;
            let state = store.state();
            for review in state.offers.reviews.iter() {
                println!(
                    "{} {}/5 ({}): {}",
                    review.user.name,
                    review.rating,
                    review.date.format("%B %Y"),
                    review.comment
                );
            }
        }
        Command::Review {
            id,
            rating,
            comment,
        } => {
            if !can_access_private(&store.state()) {
                return Err("Sign in to post a review".to_string());
            }
            let draft = ReviewDraft { rating, comment };
            draft.validate().map_err(|e| e.to_string())?;
            effects::post_review(store, &id, &draft)
                .await
                .map_err(|e| e.to_string())?;
            println!(
                "Review posted. {} reviews for {}",
                store.state().offers.reviews.len(),
                id
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to six-cities.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("six-cities.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            city: args.city,
            base_url: args.base_url,
        },
    );
    log::info!("Six cities starting against {}", resolved.base_url);

    let store = match build_store(&resolved) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&store, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
