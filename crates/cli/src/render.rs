//! Plain text rendering of tab content.

use place_core::view::{
    HoursView, Listing, OverviewView, PhotosView, ReviewsView, ServicesView,
};
use place_core::TabContent;
use std::fmt::{self, Write};

/// Render one tab as text, ending with a blank line.
pub fn render_tab(content: TabContent<'_>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "== {} ==", content.tab().label())?;

    match content {
        TabContent::Overview(view) => render_overview(&mut out, view)?,
        TabContent::Hours(view) => render_hours(&mut out, view)?,
        TabContent::Services(view) => render_services(&mut out, view)?,
        TabContent::Reviews(view) => render_reviews(&mut out, view)?,
        TabContent::Photos(view) => render_photos(&mut out, view)?,
    }

    out.push('\n');
    Ok(out)
}

fn render_overview(out: &mut String, view: &OverviewView) -> fmt::Result {
    writeln!(out, "{}", view.name)?;

    if let Some(rating) = &view.rating {
        writeln!(
            out,
            "{} {} ({} reviews)",
            rating.stars, rating.score, rating.total_ratings
        )?;
    }

    match &view.price {
        Some(price) => writeln!(out, "{}  {}", view.status, price)?,
        None => writeln!(out, "{}", view.status)?,
    }

    let fields = [
        ("Address", view.address.as_deref()),
        ("Phone", view.phone.as_ref().map(|p| p.display.as_str())),
        ("Website", view.website.as_deref()),
        ("Google Maps", view.maps_url.as_deref()),
        ("Coordinates", view.coordinates.as_deref()),
        ("Plus Code", view.plus_code.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{}: {}", label, value)?;
        }
    }

    if !view.categories.is_empty() {
        writeln!(out, "Categories: {}", view.categories.join(", "))?;
    }

    if let Some(about) = &view.about {
        writeln!(out, "About: {}", about)?;
    }

    Ok(())
}

fn render_hours(out: &mut String, view: &HoursView) -> fmt::Result {
    if let Some(status) = view.open_status {
        writeln!(out, "[{}]", status.label())?;
    }

    render_listing(out, &view.weekdays, |out, line| writeln!(out, "  {}", line))?;

    if let Some(secondary) = &view.secondary {
        writeln!(out, "Special Hours:")?;
        for line in secondary {
            writeln!(out, "  {}", line)?;
        }
    }

    Ok(())
}

fn render_services(out: &mut String, view: &ServicesView) -> fmt::Result {
    render_listing(out, &view.entries, |out, entry| {
        let mark = if entry.available { "yes" } else { "no" };
        writeln!(out, "  [{}] {}", mark, entry.label)
    })
}

fn render_reviews(out: &mut String, view: &ReviewsView) -> fmt::Result {
    render_listing(out, &view.reviews, |out, review| {
        let stars = review.stars.map(|s| s.to_string()).unwrap_or_default();
        writeln!(out, "{} {} {}", review.author, stars, review.relative_time)?;
        if !review.text.is_empty() {
            writeln!(out, "  {}", review.text)?;
        }
        Ok(())
    })
}

fn render_photos(out: &mut String, view: &PhotosView) -> fmt::Result {
    render_listing(out, &view.photos, |out, photo| {
        writeln!(out, "  {} ({})", photo.url, photo.alt)
    })
}

fn render_listing<T>(
    out: &mut String,
    listing: &Listing<T>,
    mut item: impl FnMut(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    match listing {
        Listing::Items(items) => {
            for entry in items {
                item(out, entry)?;
            }
            Ok(())
        }
        Listing::Placeholder(text) => writeln!(out, "{}", text),
    }
}
