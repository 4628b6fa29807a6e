// SPDX-License-Identifier: Apache-2.0

//! Drive the writer by hand and print the result to stdout.

use duojson::{FileWriteStream, Handler, Writer};

fn main() {
    env_logger::init();

    let mut writer = Writer::new(FileWriteStream::new(std::io::stdout().lock()));
    writer.start_object();
    writer.key("B");
    writer.start_array();
    writer.string("ByteDance");
    writer.string("BaiDu");
    writer.end_array();
    writer.key("A");
    writer.string("Alibaba");
    writer.key("T");
    writer.string("Tencent");
    writer.end_object();

    if let Err(e) = writer.into_inner().finish() {
        eprintln!("Error: Unable to write to stdout: {}", e);
        std::process::exit(1);
    }
    println!();
}
