//! Connect to the demo server on port 49110 and print its greeting.

use tcpsock::{last_error_code, Socket};

fn main() {
    let client = match Socket::client(49110) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}: {}", last_error_code());
            std::process::exit(1);
        }
    };

    if let Err(err) = client.connect() {
        eprintln!("{err}: {}", last_error_code());
        std::process::exit(1);
    }
    println!("Connected to server");

    match client.recv() {
        Ok(data) => println!("Server says: {}", String::from_utf8_lossy(&data)),
        Err(err) => eprintln!("{err}: {}", last_error_code()),
    }
}
