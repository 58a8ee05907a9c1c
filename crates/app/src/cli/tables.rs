//! Table rendering

use emporium::{
    cart::Quote,
    money::format_amount,
    orders::Purchase,
    products::Product,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Render products as a grid.
pub fn products<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price", "Description", "Stock"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_amount(product.price),
            product.description.clone(),
            product.stock.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern());
    table.modify(Columns::new(2..3), Alignment::right());
    table.modify(Columns::new(4..5), Alignment::right());

    table.to_string()
}

/// Render a priced cart.
pub fn quote(quote: &Quote) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Quantity", "Line Total"]);

    for item in &quote.items {
        builder.push_record([
            item.name.clone(),
            item.quantity.to_string(),
            format_amount(item.line_total),
        ]);
    }

    builder.push_record([
        "Total".to_string(),
        String::new(),
        format_amount(quote.total),
    ]);

    let mut table = builder.build();

    table.with(Style::modern());
    table.modify(Columns::new(1..3), Alignment::right());

    table.to_string()
}

/// Render one past purchase.
pub fn purchase(purchase: &Purchase) -> String {
    quote(&Quote {
        items: purchase.items.clone(),
        total: purchase.total_price,
    })
}
