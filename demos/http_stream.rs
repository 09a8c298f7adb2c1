//! HTTP Stream Example
//!
//! Serves a generated sheet at `http://127.0.0.1:8080/demo.xls`, streaming the
//! document straight into the response body.
//!
//! Usage: cargo run --example http_stream

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use xlsretro::{CellValue, Converter, ConverterBuilder, Sheet, Workbook, XlsRetroError};

fn main() -> Result<(), XlsRetroError> {
    let converter = ConverterBuilder::new().build()?;
    let listener = TcpListener::bind("127.0.0.1:8080")?;
    println!("Listening on http://127.0.0.1:8080/demo.xls");

    for stream in listener.incoming() {
        let result = stream
            .map_err(XlsRetroError::from)
            .and_then(|stream| handle(&converter, stream));
        if let Err(e) = result {
            eprintln!("request failed: {}", e);
        }
    }

    Ok(())
}

fn handle(converter: &Converter, mut stream: TcpStream) -> Result<(), XlsRetroError> {
    let mut request_line = String::new();
    BufReader::new(&stream).read_line(&mut request_line)?;

    if !request_line.starts_with("GET /demo.xls ") {
        stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")?;
        return Ok(());
    }

    let sheet = Sheet::from_rows(
        "Demo",
        ["A", "B"],
        vec![
            vec![CellValue::from("x"), CellValue::from(1)],
            vec![CellValue::from("y"), CellValue::from(2)],
        ],
    );

    // No Content-Length: closing the connection ends the body
    stream.write_all(
        b"HTTP/1.1 200 OK\r\n\
          Content-Type: application/vnd.ms-excel\r\n\
          Content-Disposition: attachment; filename=\"demo.xls\"\r\n\
          Connection: close\r\n\r\n",
    )?;
    converter.write(&Workbook::from(sheet), &mut stream)?;

    Ok(())
}
