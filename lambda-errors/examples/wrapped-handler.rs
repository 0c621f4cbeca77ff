use lamedh_errors::{handler_fn, wrap_with, Context, Error, Handler, NormalizedError, Settings};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;
    let mut wrapped = wrap_with(handler_fn(func), settings);

    for event in vec![json!({ "firstName": "Ferris" }), json!({}), json!({ "firstName": 7 })] {
        match wrapped.call(event, Context::new("local")).await {
            Ok(res) => println!("ok: {}", res),
            Err(err) => println!("err: {}", err),
        }
    }
    Ok(())
}

async fn func(event: Value, _: Context) -> Result<Value, Error> {
    match event.get("firstName") {
        Some(Value::String(name)) => Ok(json!({ "message": format!("Hello, {}!", name) })),
        Some(_) => Err("firstName must be a string".into()),
        None => Err(NormalizedError::new("BadRequest", "firstName is required.", 400).into()),
    }
}
