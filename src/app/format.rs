//! HTML message templating for bot replies and channel posts.

use chrono::Local;

use crate::domain::criteria::FilterCriteria;
use crate::domain::product::Deal;

/// Medal emoji for the top ranks, numbered badge beyond.
#[must_use]
pub fn rank_emoji(rank: usize) -> String {
    match rank {
        1 => "🥇".into(),
        2 => "🥈".into(),
        3 => "🥉".into(),
        4 => "4️⃣".into(),
        5 => "5️⃣".into(),
        n => format!("{n}️⃣"),
    }
}

/// Detailed per-deal message sent to the requesting user.
#[must_use]
pub fn deal_message(deal: &Deal, rank: usize) -> String {
    let prime = if deal.is_prime_eligible { " 🚀 Prime" } else { "" };

    format!(
        "{emoji} <b>{title}</b>\n\n\
         💰 <b>Price:</b> ₹{price}\n\
         🏷️ <b>Original:</b> ₹{original}\n\
         📉 <b>Discount:</b> {discount:.1}%\n\
         💾 <b>Save:</b> ₹{savings}\n\
         ⭐ <b>Rating:</b> {rating}/5 ({reviews} reviews)\n\
         📦 <b>Status:</b> Available{prime}\n\
         🏆 <b>Score:</b> {score:.1}\n\n\
         🔗 <a href=\"{url}\">BUY NOW</a>",
        emoji = rank_emoji(rank),
        title = escape_html(&truncate(&deal.title, 100)),
        price = format_inr(deal.current_price),
        original = format_inr(deal.original_price),
        discount = deal.discount_percent,
        savings = format_inr(deal.savings),
        rating = deal.rating,
        reviews = deal.review_count,
        score = deal.deal_score,
        url = deal.monetized_url,
    )
}

/// Compact per-deal message posted to the channel.
#[must_use]
pub fn channel_deal_message(deal: &Deal, rank: usize) -> String {
    let prime = if deal.is_prime_eligible { " 🚀 Prime" } else { "" };

    format!(
        "{emoji} <b>{title}</b>\n\n\
         💰 <b>₹{price}</b> <s>₹{original}</s>\n\
         🔥 <b>{discount:.0}% OFF</b> • Save ₹{savings}\n\
         ⭐ <b>{rating}/5</b> ({reviews} reviews){prime}\n\n\
         🛒 <a href=\"{url}\"><b>BUY NOW</b></a>",
        emoji = rank_emoji(rank),
        title = escape_html(&truncate(&deal.title, 80)),
        price = format_inr(deal.current_price),
        original = format_inr(deal.original_price),
        discount = deal.discount_percent,
        savings = format_inr(deal.savings),
        rating = deal.rating,
        reviews = deal.review_count,
        url = deal.monetized_url,
    )
}

/// Channel post header preceding the ranked deals.
#[must_use]
pub fn channel_header(search_term: &str, deal_count: usize) -> String {
    format!(
        "🚨 <b>MEGA DEALS ALERT</b> 🚨\n\
         🔥 <b>Top {term} Deals</b>\n\
         📅 <b>Found at:</b> {time}\n\
         💎 <b>Premium {count} Deals</b>\n\n\
         ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
        term = escape_html(&search_term.to_uppercase()),
        time = Local::now().format("%I:%M %p"),
        count = deal_count,
    )
}

/// Channel post footer following the ranked deals.
#[must_use]
pub fn channel_footer(search_term: &str) -> String {
    format!(
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n\
         🤖 <b>Want more deals?</b> Use our bot!\n\
         🔔 <b>Enable notifications</b> for instant alerts!\n\n\
         #AmazonDeals #{tag} #MegaSale",
        tag = search_term.replace(' ', ""),
    )
}

/// Search-configuration summary echoed back before a run starts.
#[must_use]
pub fn filter_summary(criteria: &FilterCriteria) -> String {
    let max_budget = if criteria.max_budget.is_finite() {
        format!("₹{}", format_inr(criteria.max_budget))
    } else {
        "no limit".into()
    };

    format!(
        "🔧 Search Configuration:\n\
         • Term: {term}\n\
         • Min Discount: {discount}%\n\
         • Min Reviews: {reviews}\n\
         • Budget: ₹{min_budget} - {max_budget}\n\
         • Max Pages: {pages}",
        term = escape_html(&criteria.search_term),
        discount = criteria.min_discount_percent,
        reviews = criteria.min_review_count,
        min_budget = format_inr(criteria.min_budget),
        pages = criteria.max_pages,
    )
}

/// Format a rupee amount with thousands separators, no decimals.
#[must_use]
pub fn format_inr(value: f64) -> String {
    let whole = value.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0.0 && whole > 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Escape the characters HTML parse mode treats specially.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncate to at most `max_chars` characters on a char boundary.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
