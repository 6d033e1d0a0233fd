//! Renders the dashboard page from the client state.

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    client::{
        filter::{Filter, RECENT_TRANSACTIONS_LIMIT, TransactionListView},
        state::{ClientState, TransactionForm},
        stats::Stats,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FILTER_BUTTON_ACTIVE_STYLE,
        FILTER_BUTTON_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency, format_date_time, loading_spinner,
    },
    transaction::{Transaction, TransactionType},
};

/// Render the full dashboard page.
pub fn dashboard_view(state: &ClientState, local_offset: UtcOffset) -> Markup {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="text-center mb-12"
            {
                h1 class="text-5xl font-bold text-blue-600 mb-4" { "Personal Finance Tracker" }
                p class="text-gray-600 dark:text-gray-400 text-lg"
                {
                    "Smart money management for a brighter financial future"
                }
            }

            @if let Some(error) = state.error()
            {
                (error_banner(error))
            }

            (stats_cards(&state.stats()))

            (actions(state))

            div class="grid grid-cols-1 lg:grid-cols-3 gap-8"
            {
                @if state.form().visible
                {
                    div class="lg:col-span-1"
                    {
                        (transaction_form(state.form(), state.is_submitting()))
                    }
                }

                div class=(if state.form().visible { "lg:col-span-2" } else { "lg:col-span-3" })
                {
                    (transaction_list(state, local_offset))
                }
            }
        }
    );

    base("Dashboard", &content)
}

fn error_banner(message: &str) -> Markup {
    html!(
        div
            id="error-banner"
            role="alert"
            class="mb-8 p-4 bg-red-100 border-l-4 border-red-500 rounded-lg shadow-md"
        {
            p class="text-red-700 font-medium" { (message) }
        }
    )
}

fn stats_cards(stats: &Stats) -> Markup {
    let (balance_label, balance_style) = if stats.is_balance_positive() {
        ("Positive Balance", "text-blue-600")
    } else {
        ("Negative Balance", "text-orange-600")
    };

    html!(
        section id="stats" class="grid grid-cols-1 md:grid-cols-3 gap-8 mb-12"
        {
            div id="income-card" class=(CARD_STYLE)
            {
                p class="text-sm font-medium text-green-700" { "Total Income" }
                p class="text-2xl font-bold" data-amount { (format_currency(stats.income)) }
                span class="text-xs font-medium" { "+" (stats.income_count) " transactions" }
            }

            div id="expenses-card" class=(CARD_STYLE)
            {
                p class="text-sm font-medium text-red-700" { "Total Expenses" }
                p class="text-2xl font-bold" data-amount { (format_currency(stats.expenses)) }
                span class="text-xs font-medium" { (stats.expense_count) " transactions" }
            }

            div id="balance-card" class=(CARD_STYLE)
            {
                p class={ "text-sm font-medium " (balance_style) } { "Net Balance" }
                p class="text-2xl font-bold" data-amount { (format_currency(stats.balance)) }
                span class="text-xs font-medium" { (balance_label) }
            }
        }
    )
}

fn actions(state: &ClientState) -> Markup {
    let toggle_text = if state.form().visible {
        "Hide Form"
    } else {
        "Add Transaction"
    };

    html!(
        div class="flex justify-center gap-4 mb-8"
        {
            form method="post" action=(endpoints::DASHBOARD_TOGGLE_FORM)
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (toggle_text) }
            }

            form method="post" action=(endpoints::DASHBOARD_REFRESH)
            {
                button
                    type="submit"
                    id="refresh-button"
                    class=(BUTTON_SECONDARY_STYLE)
                    disabled[state.is_fetching()]
                {
                    "Refresh"
                }
            }
        }
    )
}

fn transaction_form(form: &TransactionForm, is_submitting: bool) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            h2 class="text-xl font-bold mb-6" { "Add New Transaction" }

            form
                id="transaction-form"
                method="post"
                action=(endpoints::DASHBOARD_SUBMIT)
                class="space-y-4"
            {
                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="text"
                        name="description"
                        id="description"
                        placeholder="Enter transaction description"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required
                        value=(form.description);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        min="0"
                        placeholder="Enter amount"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required
                        value=(form.amount);
                }

                div
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for kind in [TransactionType::Expense, TransactionType::Income]
                        {
                            option value=(kind.as_str()) selected[form.kind == kind]
                            {
                                (type_label(kind))
                            }
                        }
                    }
                }

                button
                    type="submit"
                    class={ "w-full justify-center " (BUTTON_PRIMARY_STYLE) }
                    disabled[is_submitting]
                {
                    @if is_submitting { "Adding..." } @else { "Add Transaction" }
                }
            }
        }
    )
}

fn type_label(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    }
}

fn filter_buttons(active: Filter) -> Markup {
    html!(
        div id="filters" class="flex gap-2"
        {
            @for filter in Filter::ALL
            {
                form method="post" action=(endpoints::DASHBOARD_FILTER)
                {
                    input type="hidden" name="filter" value=(filter.as_str());
                    button
                        type="submit"
                        class=(if filter == active { FILTER_BUTTON_ACTIVE_STYLE } else { FILTER_BUTTON_STYLE })
                        aria-pressed=(if filter == active { "true" } else { "false" })
                    {
                        (filter.label())
                    }
                }
            }
        }
    )
}

fn transaction_list(state: &ClientState, local_offset: UtcOffset) -> Markup {
    let list = state.list_view();

    html!(
        section id="transactions" class=(CARD_STYLE)
        {
            div class="flex items-center justify-between mb-6"
            {
                h2 class="text-xl font-bold" { "Recent Transactions" }
                (filter_buttons(state.filter()))
            }

            @if state.is_fetching() && state.transactions().is_empty()
            {
                div class="text-center py-12"
                {
                    (loading_spinner())
                    p class="text-gray-500 font-medium" { "Loading your financial data..." }
                }
            }
            @else if list.is_empty()
            {
                div class="text-center py-12"
                {
                    p class="text-gray-500 font-medium mb-2" { "No transactions found" }
                    p class="text-sm text-gray-400" { "Add your first transaction to get started!" }
                }
            }
            @else
            {
                (transaction_items(&list, state.filter(), local_offset))
            }
        }
    )
}

fn transaction_items(
    list: &TransactionListView<'_>,
    filter: Filter,
    local_offset: UtcOffset,
) -> Markup {
    html!(
        ul class="space-y-4"
        {
            @for transaction in &list.shown
            {
                (transaction_item(transaction, local_offset))
            }
        }

        @if list.remaining() > 0
        {
            p id="list-footer" class="text-center pt-4 text-gray-500 text-sm"
            {
                (list_footer_text(list, filter))
            }
        }
    )
}

fn list_footer_text(list: &TransactionListView<'_>, filter: Filter) -> String {
    let kind = match filter {
        Filter::All => String::new(),
        other => format!("{} ", other.as_str()),
    };

    format!(
        "Showing {RECENT_TRANSACTIONS_LIMIT} of {} {kind}transactions ({} more)",
        list.total,
        list.remaining()
    )
}

fn transaction_item(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let (sign, style) = match transaction.kind {
        TransactionType::Income => ("+", "border-green-400 text-green-600"),
        TransactionType::Expense => ("-", "border-red-400 text-red-600"),
    };

    html!(
        li
            class={ "p-4 rounded-xl border-l-4 flex items-center justify-between " (style) }
            data-transaction-id=(transaction.id)
        {
            div
            {
                h3 class="font-semibold text-gray-800 dark:text-gray-100 mb-1" { (transaction.description) }
                p class="text-sm text-gray-500"
                {
                    (format_date_time(transaction.date, local_offset))
                }
            }

            div class="text-right"
            {
                p class="text-xl font-bold" data-amount
                {
                    (sign) (format_currency(transaction.amount.abs()))
                }
                span class="text-xs px-3 py-1 rounded-full font-medium" { (type_label(transaction.kind)) }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, UtcOffset};

    use crate::{
        client::{api::ApiError, filter::Filter, state::ClientState, view::dashboard_view},
        test_utils::{assert_form_input, assert_valid_html, must_get_form},
        transaction::{Transaction, TransactionType},
    };

    fn transaction(id: i64, kind: TransactionType) -> Transaction {
        Transaction {
            id,
            description: format!("transaction {id}"),
            amount: 10.0,
            kind,
            date: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn fetched_state(transactions: Vec<Transaction>) -> ClientState {
        let mut state = ClientState::default();
        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, Ok(transactions));
        state
    }

    fn render(state: &ClientState) -> Html {
        let html = Html::parse_document(&dashboard_view(state, UtcOffset::UTC).into_string());
        assert_valid_html(&html);
        html
    }

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn shows_totals() {
        let state = fetched_state(vec![
            transaction(1, TransactionType::Income),
            transaction(2, TransactionType::Income),
            transaction(3, TransactionType::Expense),
        ]);

        let html = render(&state);

        assert_eq!(
            select_text(&html, "#stats [data-amount]"),
            vec!["₹20.00", "₹10.00", "₹10.00"]
        );
        let balance_card = select_text(&html, "#balance-card span");
        assert_eq!(balance_card, vec!["Positive Balance"]);
    }

    #[test]
    fn shows_at_most_five_transactions_with_footer() {
        let state = fetched_state(
            (1..=7)
                .map(|id| transaction(id, TransactionType::Expense))
                .collect(),
        );

        let html = render(&state);

        let items = html
            .select(&Selector::parse("li[data-transaction-id]").unwrap())
            .map(|item| item.value().attr("data-transaction-id").unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(items, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(
            select_text(&html, "#list-footer"),
            vec!["Showing 5 of 7 transactions (2 more)"]
        );
    }

    #[test]
    fn footer_names_active_filter() {
        let mut state = fetched_state(
            (1..=6)
                .map(|id| transaction(id, TransactionType::Income))
                .collect(),
        );
        state.set_filter(Filter::Income);

        let html = render(&state);

        assert_eq!(
            select_text(&html, "#list-footer"),
            vec!["Showing 5 of 6 income transactions (1 more)"]
        );
    }

    #[test]
    fn no_footer_for_short_list() {
        let state = fetched_state(vec![transaction(1, TransactionType::Income)]);

        let html = render(&state);

        assert!(select_text(&html, "#list-footer").is_empty());
    }

    #[test]
    fn shows_empty_state_when_filter_matches_nothing() {
        let mut state = fetched_state(vec![transaction(1, TransactionType::Income)]);
        state.set_filter(Filter::Expense);

        let html = render(&state);

        let text = select_text(&html, "#transactions p");
        assert!(text.contains(&"No transactions found".to_owned()), "got {text:?}");
    }

    #[test]
    fn shows_loading_state_during_first_fetch() {
        let mut state = ClientState::default();
        state.begin_fetch();

        let html = render(&state);

        let text = select_text(&html, "#transactions p");
        assert!(text.contains(&"Loading your financial data...".to_owned()), "got {text:?}");
        let refresh = html
            .select(&Selector::parse("#refresh-button").unwrap())
            .next()
            .unwrap();
        assert!(refresh.value().attr("disabled").is_some());
    }

    #[test]
    fn shows_error_banner() {
        let mut state = fetched_state(vec![transaction(1, TransactionType::Income)]);
        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, Err(ApiError::Status(503)));

        let html = render(&state);

        assert_eq!(
            select_text(&html, "#error-banner"),
            vec!["Failed to connect to backend. Make sure the server is running."]
        );
        assert_eq!(html.select(&Selector::parse("li").unwrap()).count(), 1);
    }

    #[test]
    fn form_is_hidden_until_toggled() {
        let mut state = ClientState::default();
        let html = render(&state);
        assert!(html.select(&Selector::parse("#transaction-form").unwrap()).next().is_none());

        state.toggle_form();
        let html = render(&state);

        let form = must_get_form(&html, "#transaction-form");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
    }

    #[test]
    fn form_keeps_typed_values() {
        let mut state = ClientState::default();
        state.toggle_form();
        state.update_form("Salary", "1000", TransactionType::Income);

        let html = render(&state);

        let form = must_get_form(&html, "#transaction-form");
        let description = form
            .select(&Selector::parse("input[name=description]").unwrap())
            .next()
            .unwrap();
        assert_eq!(description.value().attr("value"), Some("Salary"));
        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .unwrap();
        assert_eq!(selected.value().attr("value"), Some("income"));
    }

    #[test]
    fn expense_amounts_are_prefixed_with_minus() {
        let state = fetched_state(vec![transaction(1, TransactionType::Expense)]);

        let html = render(&state);

        assert_eq!(select_text(&html, "li [data-amount]"), vec!["-₹10.00"]);
    }
}
