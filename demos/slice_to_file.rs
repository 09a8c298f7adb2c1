//! Slice to File Example
//!
//! Builds a payment sheet from in-memory records and writes it as a
//! legacy `.xls` file that banking portals accept.

use xlsretro::{CellValue, ConverterBuilder, Sheet, Workbook, XlsRetroError};

struct Payment {
    account_no: &'static str,
    amount: f64,
    reference: &'static str,
}

fn main() -> Result<(), XlsRetroError> {
    let items = [
        Payment {
            account_no: "1234567890",
            amount: 1200.50,
            reference: "Invoice-001",
        },
        Payment {
            account_no: "0987654321",
            amount: 300.00,
            reference: "Invoice-002",
        },
    ];

    // Account numbers stay strings so leading zeros survive
    let rows = items
        .iter()
        .map(|p| {
            vec![
                CellValue::from(p.account_no),
                CellValue::from(p.amount),
                CellValue::from(p.reference),
            ]
        })
        .collect();

    let sheet = Sheet::from_rows("Payments", ["AccountNo", "Amount", "Reference"], rows);

    let converter = ConverterBuilder::new().build()?;
    converter.write_file("payments.xls", &Workbook::from(sheet))?;

    println!("✓ Wrote payments.xls");
    Ok(())
}
