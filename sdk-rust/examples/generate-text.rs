use autopost_sdk::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput,
};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let model = OpenAIChatModel::new(
        "gpt-4o-mini",
        OpenAIChatModelOptions {
            api_key: std::env::var("OPENAI_API_KEY")
                .expect("OPENAI_API_KEY environment variable must be set"),
            ..Default::default()
        },
    );

    let response = model
        .generate(LanguageModelInput {
            system_prompt: Some("You are an expert B2B SaaS writer.".to_string()),
            prompt: "Write a one-paragraph intro about CRM tools.".to_string(),
            max_tokens: Some(200),
            temperature: Some(0.2),
        })
        .await
        .unwrap();

    println!("{response:#?}");
}
