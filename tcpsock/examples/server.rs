//! Accept one peer on port 49110 and greet it.

use tcpsock::{last_error_code, Socket};

fn main() {
    let server = match Socket::server(49110) {
        Ok(server) => server,
        Err(err) => {
            eprintln!("{err}: {}", last_error_code());
            std::process::exit(1);
        }
    };

    let client = match server.accept() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}: {}", last_error_code());
            std::process::exit(1);
        }
    };

    println!("Client connected: {}:{}", client.peer_ip(), client.port());
    if let Err(err) = server.send_on(client.descriptor(), b"Hello") {
        eprintln!("{err}: {}", last_error_code());
    }
}
