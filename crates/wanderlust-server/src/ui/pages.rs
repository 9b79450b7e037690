use chrono::NaiveDate;

use super::html::{escape, flash, layout, script_json};
use super::state::{TripView, UiState};
use crate::models::{BudgetTier, Recommendation, TransportMode, TripRecord, TripType, MAX_TRIP_DAYS};
use crate::services::budget::{ActivityKey, BudgetSummary};

const INTERESTS: [&str; 5] = ["History", "Food", "Adventure", "Relaxation", "Art"];

const LEAFLET_HEAD: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>"#;

const AUTOCOMPLETE_SCRIPT: &str = r#"<script>
  document.querySelectorAll('input[data-suggest]').forEach(function (input) {
    var list = document.getElementById(input.getAttribute('list'));
    var pending;
    input.addEventListener('input', function () {
      clearTimeout(pending);
      var q = input.value;
      if (q.length < 3) { return; }
      pending = setTimeout(function () {
        fetch('/api/v1/places/suggest?q=' + encodeURIComponent(q))
          .then(function (r) { return r.ok ? r.json() : []; })
          .then(function (names) {
            list.innerHTML = '';
            names.forEach(function (name) {
              var opt = document.createElement('option');
              opt.value = name;
              list.appendChild(opt);
            });
          })
          .catch(function () {});
      }, 300);
    });
  });
</script>"#;

fn rupees(amount: f64) -> String {
    format!("₹{amount:.0}")
}

pub fn splash(ui: &UiState) -> String {
    let body = format!(
        r#"<div class="centered">
  {flash}
  <h1>✈️ Wanderlust AI</h1>
  <p>Smart travel planning: day-by-day itineraries, live maps and a budget that adds up.</p>
  <form method="post" action="/enter"><button type="submit">Start planning</button></form>
</div>"#,
        flash = flash(ui.flash.as_ref()),
    );
    layout("Wanderlust AI", "", &body)
}

pub fn login(ui: &UiState) -> String {
    let body = format!(
        r#"<div class="centered">
  {flash}
  <h1>Welcome back</h1>
  <div class="card">
    <form method="post" action="/login">
      <label for="login-username">Username</label>
      <input id="login-username" name="username" required />
      <label for="login-password">Password</label>
      <input id="login-password" name="password" type="password" required />
      <button type="submit">Log in</button>
    </form>
  </div>
  <div class="card">
    <h3>New here?</h3>
    <form method="post" action="/signup">
      <label for="signup-username">Username</label>
      <input id="signup-username" name="username" required />
      <label for="signup-password">Password</label>
      <input id="signup-password" name="password" type="password" required />
      <button type="submit">Create account</button>
    </form>
  </div>
</div>"#,
        flash = flash(ui.flash.as_ref()),
    );
    layout("Log in · Wanderlust AI", "", &body)
}

fn plan_form(today: NaiveDate) -> String {
    let tiers = [BudgetTier::Cheap, BudgetTier::Mid, BudgetTier::Lux]
        .iter()
        .map(|t| {
            let value = serde_json::to_value(t)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let selected = if *t == BudgetTier::Mid { " selected" } else { "" };
            format!(r#"<option value="{value}"{selected}>{}</option>"#, t.label())
        })
        .collect::<String>();
    let trip_types = TripType::ALL
        .iter()
        .map(|t| format!(r#"<option value="{t}">{t}</option>"#))
        .collect::<String>();
    let interests = INTERESTS
        .iter()
        .map(|i| {
            let selected = if matches!(*i, "Food" | "Adventure") { " selected" } else { "" };
            format!(r#"<option value="{i}"{selected}>{i}</option>"#)
        })
        .collect::<String>();

    format!(
        r#"<h2>🌍 Plan Your Journey</h2>
<form method="post" action="/plan">
  <label for="destination">Destination</label>
  <input id="destination" name="destination" list="destination-options" data-suggest value="Paris, France" required />
  <datalist id="destination-options"></datalist>
  <label for="origin">Travelling from (optional)</label>
  <input id="origin" name="origin" list="origin-options" data-suggest />
  <datalist id="origin-options"></datalist>
  <label for="start_date">Start date</label>
  <input id="start_date" name="start_date" type="date" value="{today}" required />
  <label for="duration_days">Duration (days)</label>
  <input id="duration_days" name="duration_days" type="number" min="1" max="{MAX_TRIP_DAYS}" value="3" required />
  <label for="budget_tier">Budget</label>
  <select id="budget_tier" name="budget_tier">{tiers}</select>
  <label for="max_budget">Maximum budget (₹)</label>
  <input id="max_budget" name="max_budget" type="number" min="0" step="500" value="50000" required />
  <label for="traveler_count">Travellers</label>
  <input id="traveler_count" name="traveler_count" type="number" min="1" value="2" required />
  <label for="trip_type">Trip type</label>
  <select id="trip_type" name="trip_type">{trip_types}</select>
  <label for="interests">Interests</label>
  <select id="interests" name="interests" multiple size="5">{interests}</select>
  <button type="submit">Generate Itinerary 🚀</button>
</form>
<form method="post" action="/logout"><button type="submit" class="link">Log out</button></form>"#,
        today = today.format("%Y-%m-%d"),
    )
}

fn logistics_card(view: &TripView) -> String {
    let Some(logistics) = &view.logistics else {
        return String::new();
    };
    let rows = TransportMode::ALL
        .iter()
        .filter_map(|mode| {
            let cost = logistics.costs.get(mode)?;
            let time = logistics.times.get(mode).map(String::as_str).unwrap_or("-");
            Some(format!(
                "<tr><td>{mode}</td><td>₹{} (${})</td><td>{}</td></tr>",
                cost.inr,
                cost.usd,
                escape(time)
            ))
        })
        .collect::<String>();

    format!(
        r#"<div class="card">
  <h3>🧭 Getting there from {origin}</h3>
  <p>{distance} km</p>
  <table><tr><th>Mode</th><th>Cost</th><th>Time</th></tr>{rows}</table>
</div>"#,
        origin = escape(view.origin.as_deref().unwrap_or("origin")),
        distance = logistics.distance_km,
    )
}

fn map_card(view: &TripView) -> String {
    // Leaflet popups render their content as HTML.
    let mut map = view.map.clone();
    for marker in &mut map.markers {
        marker.label = escape(&marker.label);
    }
    format!(
        r#"<div class="card">
  <h3>📍 Your Route</h3>
  <div id="map"></div>
  <script>
    (function () {{
      var view = {view};
      var map = L.map('map').setView(view.center, view.zoom);
      L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
        attribution: '&copy; OpenStreetMap contributors'
      }}).addTo(map);
      var points = view.markers.map(function (m) {{
        L.marker([m.lat, m.lon]).addTo(map).bindPopup(m.label);
        return [m.lat, m.lon];
      }});
      if (points.length > 1) {{ map.fitBounds(points); }}
    }})();
  </script>
</div>"#,
        view = script_json(&map),
    )
}

fn days_section(ui: &UiState, view: &TripView) -> String {
    view.itinerary
        .days
        .iter()
        .map(|day| {
            let activities = day
                .activities
                .iter()
                .enumerate()
                .map(|(index, act)| {
                    let included = ui.budget.is_included(ActivityKey {
                        day: day.day_number,
                        index,
                    });
                    format!(
                        r#"<div class="activity{excluded}">
  <form method="post" action="/activities/toggle">
    <input type="hidden" name="day" value="{day}" />
    <input type="hidden" name="index" value="{index}" />
    <input type="checkbox" name="included" onchange="this.form.submit()"{checked} title="Count in budget" />
  </form>
  <div class="time">{time}</div>
  <div>
    <strong>{title}</strong>
    <div>{description}</div>
    <div class="muted">📍 {location} · 💰 {cost}</div>
  </div>
</div>"#,
                        excluded = if included { "" } else { " excluded" },
                        day = day.day_number,
                        checked = if included { " checked" } else { "" },
                        time = escape(&act.time),
                        title = escape(&act.title),
                        description = escape(&act.description),
                        location = escape(&act.location),
                        cost = escape(if act.cost.is_empty() { "N/A" } else { &act.cost }),
                    )
                })
                .collect::<String>();

            let theme = day
                .theme
                .as_deref()
                .map(|t| format!(" · {}", escape(t)))
                .unwrap_or_default();
            format!(
                r#"<details class="card" open><summary><strong>Day {}</strong>{theme}</summary>{activities}</details>"#,
                day.day_number
            )
        })
        .collect()
}

fn budget_card(summary: &BudgetSummary) -> String {
    let cap = match (summary.max_budget, summary.remaining) {
        (Some(max), Some(remaining)) if summary.over_budget => format!(
            "<p>Cap {} · <strong>over by {}</strong></p>",
            rupees(max),
            rupees(-remaining)
        ),
        (Some(max), Some(remaining)) => {
            format!("<p>Cap {} · {} left</p>", rupees(max), rupees(remaining))
        }
        _ => String::new(),
    };
    format!(
        r#"<div class="card" id="budget">
  <h3>💰 Budget Tracker</h3>
  <p><strong>{total}</strong> across {count} selected activities</p>
  {cap}
</div>"#,
        total = rupees(summary.total),
        count = summary.included_activities,
    )
}

fn recommendation_list(items: &[Recommendation]) -> String {
    if items.is_empty() {
        return r#"<p class="muted">No suggestions.</p>"#.to_string();
    }
    items
        .iter()
        .map(|r| {
            let mut details = Vec::new();
            if let Some(kind) = &r.kind {
                details.push(escape(kind));
            }
            if let Some(location) = &r.location {
                details.push(escape(location));
            }
            if let Some(price) = r.display_price() {
                details.push(escape(price));
            }
            if let Some(rating) = &r.rating {
                details.push(format!("⭐ {}", escape(rating)));
            }
            format!(
                r#"<div class="activity"><div><strong>{}</strong><div class="muted">{}</div></div></div>"#,
                escape(&r.name),
                details.join(" · ")
            )
        })
        .collect()
}

fn results(ui: &UiState, view: &TripView) -> String {
    let it = &view.itinerary;
    let summary = it
        .summary
        .as_deref()
        .map(|s| format!("<p>{}</p>", escape(s)))
        .unwrap_or_default();
    let total = it
        .total_estimated_cost
        .as_deref()
        .map(|t| format!(" · Estimated {}", escape(t)))
        .unwrap_or_default();
    let budget = ui.budget_summary().map(|s| budget_card(&s)).unwrap_or_default();
    let safety = if it.safety_tips.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="card"><h3>🛡️ Safety</h3><p>{}</p></div>"#, escape(&it.safety_tips))
    };

    format!(
        r#"<section id="results">
  <h2>{title}</h2>
  <p class="muted">{persona}{total} · via {source}</p>
  {summary}
  {logistics}
  {map}
  {days}
  {budget}
  <div class="grid">
    <details class="card" open><summary><strong>🏨 Hotels</strong></summary>{hotels}</details>
    <details class="card" open><summary><strong>🍽️ Dining</strong></summary>{dining}</details>
  </div>
  {safety}
</section>"#,
        title = escape(&it.title),
        persona = escape(&it.persona),
        source = escape(&view.source),
        logistics = logistics_card(view),
        map = map_card(view),
        days = days_section(ui, view),
        hotels = recommendation_list(&it.hotel_recommendations),
        dining = recommendation_list(&it.dining_recommendations),
    )
}

fn travel_bot(ui: &UiState) -> String {
    let exchange = ui
        .answer
        .as_ref()
        .map(|(q, a)| {
            format!(
                r#"<p class="muted">You: {}</p><p><strong>AI:</strong> {}</p>"#,
                escape(q),
                escape(a)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="card">
  <h3>🤖 Ask the Travel Bot</h3>
  {exchange}
  <form method="post" action="/ask">
    <input name="question" placeholder="Ask about transport, weather, or specific food spots" required />
    <button type="submit">Ask</button>
  </form>
</div>"#
    )
}

fn history(records: &[TripRecord]) -> String {
    if records.is_empty() {
        return r#"<div class="card"><h3>🗂️ Your Trips</h3><p class="muted">Nothing saved yet.</p></div>"#
            .to_string();
    }
    let items = records
        .iter()
        .map(|r| {
            format!(
                r#"<div class="activity">
  <div style="flex: 1">
    <strong>{destination}</strong> <span class="muted">{created}</span>
    <form method="post" action="/history/{id}/notes">
      <textarea name="note" rows="2" placeholder="Notes">{notes}</textarea>
      <button type="submit">Save note</button>
    </form>
  </div>
  <form method="post" action="/history/{id}/load"><button type="submit">Open</button></form>
</div>"#,
                id = r.id,
                destination = escape(&r.destination),
                created = escape(&r.created_at),
                notes = escape(&r.notes),
            )
        })
        .collect::<String>();
    format!(r#"<div class="card"><h3>🗂️ Your Trips</h3>{items}</div>"#)
}

pub fn home(ui: &UiState, records: &[TripRecord], today: NaiveDate) -> String {
    let user = ui.active_user.as_deref().unwrap_or_default();
    let results = ui
        .trip
        .as_ref()
        .map(|view| results(ui, view))
        .unwrap_or_else(|| {
            r#"<p class="muted">Fill in the form to generate your first itinerary.</p>"#.to_string()
        });

    let body = format!(
        r#"<div class="shell">
  <aside class="sidebar">{form}</aside>
  <main class="main">
    {flash}
    <h1>✈️ Wanderlust AI: Smart Travel Planner</h1>
    <p class="muted">Signed in as {user}</p>
    {results}
    {bot}
    {history}
  </main>
</div>
{AUTOCOMPLETE_SCRIPT}"#,
        form = plan_form(today),
        flash = flash(ui.flash.as_ref()),
        user = escape(user),
        bot = travel_bot(ui),
        history = history(records),
    );
    layout("Wanderlust AI", LEAFLET_HEAD, &body)
}
