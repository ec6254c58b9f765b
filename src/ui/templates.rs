//! Markup for the transactions list.

use maud::{Markup, html};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{api::TransactionItem, ui::events::ControlRole};

/// The currency sign shown after every sum.
pub const CURRENCY_SIGN: &str = "₽";

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none] [month repr:long] [year] at [hour]:[minute]");

/// Format a timestamp for display, e.g. "10 March 2019 at 03:20".
pub fn format_date(timestamp: &PrimitiveDateTime) -> String {
    timestamp
        .format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Format a sum in its shortest form, e.g. "3.5" or "120".
pub fn format_sum(sum: f64) -> String {
    sum.to_string()
}

/// One income or expense row with its delete control.
pub fn transaction_row(item: &TransactionItem) -> Markup {
    html! {
        div class={ "transaction row transaction_" (item.kind.as_str()) }
        {
            div class="col-md-7 transaction__details"
            {
                div class="transaction__icon"
                {
                    span class="fa fa-money fa-2x" {}
                }
                div class="transaction__info"
                {
                    h4 class="transaction__title" { (item.name) }
                    div class="transaction__date" { (format_date(&item.created_at)) }
                }
            }
            div class="col-md-3"
            {
                div class="transaction__sum"
                {
                    (format_sum(item.sum)) " "
                    span class="currency" { (CURRENCY_SIGN) }
                }
            }
            div class="col-md-2 transaction__controls"
            {
                button
                    class="btn btn-danger transaction__remove"
                    data-role=(ControlRole::RemoveTransaction.as_attr())
                    data-id=(item.id)
                {
                    i class="fa fa-trash" {}
                }
            }
        }
    }
}

/// Every row of `items`, in order.
pub fn transactions_list(items: &[TransactionItem]) -> Markup {
    html! {
        @for item in items {
            (transaction_row(item))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Selector;
    use time::macros::datetime;

    use crate::{
        api::{TransactionItem, TransactionKind},
        test_utils::{assert_valid_html, parse_html_fragment},
        ui::{
            events::{ControlRole, Element},
            templates::{format_date, format_sum, transaction_row, transactions_list},
        },
    };

    fn coffee() -> TransactionItem {
        TransactionItem {
            id: "7".to_owned(),
            kind: TransactionKind::Expense,
            name: "Coffee".to_owned(),
            sum: 3.5,
            created_at: datetime!(2019-03-10 03:20:41),
        }
    }

    #[test]
    fn formats_date_for_display() {
        assert_eq!(
            format_date(&datetime!(2019-03-10 03:20:41)),
            "10 March 2019 at 03:20"
        );
    }

    #[test]
    fn formats_sums_without_trailing_zeros() {
        assert_eq!(format_sum(3.5), "3.5");
        assert_eq!(format_sum(120.0), "120");
    }

    #[test]
    fn row_shows_transaction_details() {
        let html = parse_html_fragment(&transaction_row(&coffee()).into_string());
        assert_valid_html(&html);

        let row = html
            .select(&Selector::parse("div.transaction.transaction_expense").unwrap())
            .next()
            .expect("No expense row found");

        let text_of = |selector: &str| {
            row.select(&Selector::parse(selector).unwrap())
                .next()
                .unwrap_or_else(|| panic!("No element matching {selector}"))
                .text()
                .collect::<String>()
        };
        assert_eq!(text_of(".transaction__title"), "Coffee");
        assert_eq!(text_of(".transaction__date"), "10 March 2019 at 03:20");
        assert_eq!(text_of(".transaction__sum").trim(), "3.5 ₽");
    }

    #[test]
    fn row_delete_button_carries_role_and_id() {
        let html = parse_html_fragment(&transaction_row(&coffee()).into_string());

        let button = html
            .select(&Selector::parse("button.transaction__remove").unwrap())
            .next()
            .expect("No delete button found");
        let element =
            Element::from_attrs(button.value().attr("data-role"), button.value().attr("data-id"));

        assert_eq!(
            element,
            Element::control(ControlRole::RemoveTransaction).with_id("7")
        );
    }

    #[test]
    fn list_renders_one_row_per_item_in_order() {
        let mut salary = coffee();
        salary.id = "8".to_owned();
        salary.kind = TransactionKind::Income;
        salary.name = "Salary".to_owned();

        let html =
            parse_html_fragment(&transactions_list(&[coffee(), salary]).into_string());
        let titles: Vec<String> = html
            .select(&Selector::parse(".transaction__title").unwrap())
            .map(|title| title.text().collect())
            .collect();

        assert_eq!(titles, vec!["Coffee", "Salary"]);
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(transactions_list(&[]).into_string(), "");
    }
}
