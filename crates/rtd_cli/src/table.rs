use comfy_table::{Row, Table};

pub(crate) const UTF8_FULL: &str = "││──├──┤     ──╭╮╰╯";

pub(crate) fn list(header: Row, rows: Vec<Row>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table.add_rows(rows);

    table.trim_fmt()
}
