use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("MEDBOT_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    println!("🔍 Testing Medical Chatbot Client");

    println!("\n📋 Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;

    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    println!("\n💬 Chat Test:");
    let chat_payload = json!({
        "question": "What are the common symptoms of acne?",
        "model": "llama3-8b-8192"
    });

    let chat_response = client
        .post(format!("{}/api/chat", base_url))
        .json(&chat_payload)
        .send()
        .await?;

    println!("Status: {}", chat_response.status());
    let chat_json: serde_json::Value = chat_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&chat_json)?);

    println!("\n📚 Conversation:");
    let history_response = client.get(format!("{}/api/history", base_url)).send().await?;
    let history_json: serde_json::Value = history_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&history_json)?);

    println!("\n✅ Client test completed!");
    Ok(())
}
