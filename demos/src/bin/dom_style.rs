// SPDX-License-Identifier: Apache-2.0

//! Parse a document, read and change it in place, then write it to a file.
//!
//! Usage: `dom_style [output.json]` (defaults to `dom_style.json`).

use std::env;
use std::fs::File;

use duojson::{Document, FileWriteStream, Writer};

const INPUT: &str = r#"{
    "precision": "zip",
    "Latitude": 37.766800000000003,
    "Longitude": -122.3959,
    "Address": "",
    "City": "SAN FRANCISCO",
    "State": "CA",
    "Zip": "94107",
    "Country": "US"
}"#;

fn main() {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "dom_style.json".to_string());

    let mut doc = Document::new();
    if let Err(e) = doc.parse(INPUT) {
        eprintln!("Error: JSON parsing failed: {}", e);
        std::process::exit(1);
    }

    // Indexing panics on a missing key; find_member is the checked lookup
    println!("{}", doc["Country"].get_string());
    if let Some(country) = doc.find_member("Country") {
        println!("{}", country.value().get_string());
    }

    let address = doc["Address"].set_string("Block 1, Street 2");
    println!("{}", address.get_string());

    doc.add_member("this_project", "duojson");
    if let Some(member) = doc.find_member("this_project") {
        println!("{} : {}", member.key(), member.value().get_string());
    }

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Unable to create file '{}': {}", path, e);
            std::process::exit(1);
        }
    };
    let mut writer = Writer::new(FileWriteStream::new(file));
    doc.write_to(&mut writer);
    if let Err(e) = writer.into_inner().finish() {
        eprintln!("Error: Unable to write file '{}': {}", path, e);
        std::process::exit(1);
    }
    log::info!("wrote {}", path);
}
