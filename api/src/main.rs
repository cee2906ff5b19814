use medbot_api::{create_app, AppState};
use medbot_rag::{Chatbot, Settings};

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    let chatbot = match Chatbot::from_settings(&settings).await {
        Ok(chatbot) => {
            println!("Medical chatbot initialized successfully");
            chatbot
        }
        Err(e) => fail(e),
    };

    let app = create_app(AppState::new(chatbot));

    let listener = match tokio::net::TcpListener::bind(&settings.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => fail(e),
    };
    if let Ok(addr) = listener.local_addr() {
        println!("Listening on http://{}", addr);
    }

    if let Err(e) = axum::serve(listener, app).await {
        fail(e);
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    log::error!("{}", error);
    eprintln!("{}", error);
    std::process::exit(1);
}
