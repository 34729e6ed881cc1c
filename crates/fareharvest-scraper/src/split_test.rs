use super::*;

const BOILERPLATE: [&str; 3] = ["Book", "View Deal", "Info"];

fn assert_free_of_boilerplate(split: &PriceSplit) {
    for token in BOILERPLATE {
        assert!(
            !split.price.contains(token) && !split.website.contains(token),
            "{token:?} leaked into {split:?}"
        );
    }
}

// -----------------------------------------------------------------------
// normalize_widget_text
// -----------------------------------------------------------------------

#[test]
fn normalize_strips_cabin_labels_then_calls_to_action() {
    let text = "\n$89\nBasic Economy\nFrontier\nView Deal\n";
    assert_eq!(normalize_widget_text(text), "$89 Frontier");
}

#[test]
fn normalize_strips_italian_call_to_action() {
    let text = "120 €\nCabina principale\neDreams\nVedi offerta";
    assert_eq!(normalize_widget_text(text), "120 € eDreams");
}

#[test]
fn normalize_collapses_inconsistent_whitespace() {
    let text = "  $120 \n\n\t Delta   Air  Lines ";
    assert_eq!(normalize_widget_text(text), "$120 Delta Air Lines");
}

// -----------------------------------------------------------------------
// dollar branch
// -----------------------------------------------------------------------

#[test]
fn dollar_price_precedes_channel() {
    let split = split_price_and_channel("$120 Delta View Deal");
    assert_eq!(split.price, "120");
    assert_eq!(split.website, "Delta");
    assert_free_of_boilerplate(&split);
}

#[test]
fn dollar_price_keeps_thousands_separator() {
    let split = split_price_and_channel("\n$1,245\n Main Cabin\nAmerican Airlines\nView Deal\n");
    assert_eq!(split.price, "1,245");
    assert_eq!(split.website, "American Airlines");
}

#[test]
fn dollar_without_channel_yields_empty_label() {
    let split = split_price_and_channel("$120");
    assert_eq!(split.price, "120");
    assert_eq!(split.website, "");
}

#[test]
fn dollar_channel_is_cut_at_call_to_action_split_by_newline() {
    // "View\nDeal" survives caption stripping and only lines up once
    // whitespace is collapsed.
    let split = split_price_and_channel("$75 Expedia View\nDeal");
    assert_eq!(split.price, "75");
    assert_eq!(split.website, "Expedia");
    assert_free_of_boilerplate(&split);
}

#[test]
fn dollar_channel_drops_info_label() {
    let split = split_price_and_channel("$210 Info United Book");
    assert_eq!(split.price, "210");
    assert_eq!(split.website, "United");
    assert_free_of_boilerplate(&split);
}

// -----------------------------------------------------------------------
// euro branch
// -----------------------------------------------------------------------

#[test]
fn euro_glyph_separates_price_from_channel() {
    let split = split_price_and_channel("95 € Ryanair View Deal");
    assert_eq!(split.price, "95");
    assert_eq!(split.website, "Ryanair");
    assert_free_of_boilerplate(&split);
}

#[test]
fn euro_italian_locale_widget() {
    let split = split_price_and_channel("1.045 €\nlastminute.com\nVedi offerta");
    assert_eq!(split.price, "1.045");
    assert_eq!(split.website, "lastminute.com");
}

#[test]
fn euro_second_glyph_does_not_leak_into_channel() {
    let split = split_price_and_channel("95 € Ryanair 12 € Book");
    assert_eq!(split.price, "95");
    assert_eq!(split.website, "Ryanair 12");
}

#[test]
fn dollar_takes_precedence_over_euro() {
    let split = split_price_and_channel("$130 Iberia €");
    assert_eq!(split.price, "130");
    assert_eq!(split.website, "Iberia");
}

// -----------------------------------------------------------------------
// no currency branch
// -----------------------------------------------------------------------

#[test]
fn missing_currency_uses_no_price_sentinel() {
    let split = split_price_and_channel("Info\nSpirit Airlines\nView Deal");
    assert_eq!(split.price, NO_PRICE);
    assert_eq!(split.website, "Spirit Airlines");
    assert_free_of_boilerplate(&split);
}

#[test]
fn missing_currency_with_only_boilerplate_yields_empty_label() {
    let split = split_price_and_channel("Info Book");
    assert_eq!(split.price, NO_PRICE);
    assert_eq!(split.website, "");
}

#[test]
fn every_branch_is_free_of_boilerplate() {
    let samples = [
        "$99 Southwest Book View Deal Info",
        "\n$305\nEconomy\nCheapOair\nView Deal",
        "45 €\nVueling\nBook\nInfo",
        "Info Allegiant Book",
        "Basic\nSun Country\nVedi offerta\nInfo",
    ];
    for sample in samples {
        assert_free_of_boilerplate(&split_price_and_channel(sample));
    }
}

#[test]
fn euro_glyph_leading_amount() {
    let split = split_price_and_channel("€95 Ryanair View Deal");
    assert_eq!(split.price, "95");
    assert_eq!(split.website, "Ryanair");
    assert_free_of_boilerplate(&split);
}

#[test]
fn euro_glyph_leading_amount_with_space_and_separator() {
    let split = split_price_and_channel("€ 1.045,50\nlastminute.com\nVedi offerta");
    assert_eq!(split.price, "1.045,50");
    assert_eq!(split.website, "lastminute.com");
}

#[test]
fn dollar_after_leading_label() {
    let split = split_price_and_channel("Info $120 Delta View Deal");
    assert_eq!(split.price, "120");
    assert_eq!(split.website, "Delta");
    assert_free_of_boilerplate(&split);
}

#[test]
fn dollar_keeps_channel_text_ahead_of_glyph() {
    let split = split_price_and_channel("Delta $120 View Deal");
    assert_eq!(split.price, "120");
    assert_eq!(split.website, "Delta");
}

#[test]
fn glyph_without_amount_uses_no_price_sentinel() {
    for raw in ["$ Delta View Deal", "€ Ryanair View Deal"] {
        let split = split_price_and_channel(raw);
        assert_eq!(split.price, NO_PRICE, "raw {raw:?}");
        assert!(!split.website.is_empty(), "raw {raw:?}");
    }
}

#[test]
fn book_label_is_removed_inside_channel_names() {
    // Call-to-action labels are stripped as plain substrings.
    let split = split_price_and_channel("$88 Booking.com View Deal");
    assert_eq!(split.price, "88");
    assert_eq!(split.website, "ing.com");
}
