//! Small walkthrough of the store against a JSON file.
//!
//! Usage: `jsondb-demo [PATH]` (defaults to `./db.json`). Set `RUST_LOG=debug` to see
//! every load and flush.

use std::{env, process::ExitCode};

use jsondb::{document, prelude::*};
use log::error;

fn run(path: Option<String>) -> JsonDbResult<()> {
    let mut builder = JsonFileStore::builder();

    if let Some(path) = path {
        builder = builder.path(path);
    }

    let db = builder.open()?;

    let created_post = db.create("posts", document! { "title" => "super title" })?;
    println!("createdPost: {created_post:?}");

    let all_posts = db.read("posts", None);
    println!("allPosts: {all_posts:?}");

    let absent_post = db.read("posts", Some(&document! { "title" => "new title" }));
    println!("absentPost: {absent_post:?}");

    let present_post = db.read("posts", Some(&document! { "title" => "super title" }));
    println!("presentPost: {present_post:?}");

    db.add_collection("users")?;
    println!("collections: {}", db.get_all_collections());
    println!("users exists: {}", db.does_collection_exist("users"));

    db.remove_collection("users")?;
    println!("collections: {}", db.get_all_collections());

    println!("scan:\n{}", serde_json::to_string_pretty(&db.scan())?);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");

            ExitCode::FAILURE
        }
    }
}
