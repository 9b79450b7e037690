//! Deterministic itinerary used when no hosted model produces one.
//!
//! The output depends only on destination, duration and trip type.

use crate::models::{Activity, DayPlan, Itinerary, Recommendation, TripType};

struct Theme {
    name: &'static str,
    description: &'static str,
}

const THEMES: [Theme; 10] = [
    Theme { name: "Arrival & Discovery", description: "Explore the main plaza and settle in." },
    Theme { name: "History & Culture", description: "Deep dive into local heritage." },
    Theme { name: "Nature & Parks", description: "Relax amidst nature and greenery." },
    Theme { name: "Local Vibe", description: "Taste the authentic local flavors." },
    Theme { name: "Adventure", description: "Get active with a city view." },
    Theme { name: "Art & Soul", description: "Experience the creative side." },
    Theme { name: "Shopping Spree", description: "Hunt for souvenirs and crafts." },
    Theme { name: "Relaxation", description: "Unwind and recharge." },
    Theme { name: "Hidden Gems", description: "Discover the parts tourists miss." },
    Theme { name: "Departure", description: "One last coffee before you go." },
];

fn theme_for(day: u32, duration: u32) -> &'static Theme {
    if day == 1 {
        &THEMES[0]
    } else if day == duration {
        &THEMES[THEMES.len() - 1]
    } else {
        let middle = (THEMES.len() - 2) as u32;
        &THEMES[((day % middle) + 1) as usize]
    }
}

/// Template day `day` of a `duration`-day trip.
pub fn day_plan(destination: &str, day: u32, duration: u32) -> DayPlan {
    let theme = theme_for(day, duration);
    let activity = |time: &str, title: String, description: &str, cost: &str| Activity {
        time: time.to_string(),
        title,
        description: description.to_string(),
        location: destination.to_string(),
        cost: cost.to_string(),
    };

    DayPlan {
        day_number: day,
        theme: Some(theme.name.to_string()),
        daily_total: Some(format!("₹{}", 3000 + day * 200)),
        activities: vec![
            activity("09:00", format!("{}: Morning", theme.name), theme.description, "₹500"),
            activity(
                "14:00",
                format!("{}: Afternoon", theme.name),
                "Local exploration and sightseeing.",
                "₹1,500",
            ),
            activity(
                "20:00",
                "Evening Leisure".to_string(),
                "Dinner at a recommended local spot.",
                "₹1,000",
            ),
        ],
    }
}

fn hotel(name: &str, location: &str, price: &str, rating: &str) -> Recommendation {
    Recommendation {
        name: name.to_string(),
        location: Some(location.to_string()),
        price_per_night: Some(price.to_string()),
        rating: Some(rating.to_string()),
        ..Default::default()
    }
}

fn dining(name: &str, kind: &str, location: &str, price: &str) -> Recommendation {
    Recommendation {
        name: name.to_string(),
        location: Some(location.to_string()),
        price: Some(price.to_string()),
        kind: Some(kind.to_string()),
        ..Default::default()
    }
}

pub fn fallback_itinerary(destination: &str, duration: u32, trip_type: TripType) -> Itinerary {
    let destination = destination.trim();
    let days = (1..=duration)
        .map(|day| day_plan(destination, day, duration))
        .collect();

    Itinerary {
        title: format!("The Ultimate {destination} Experience"),
        persona: format!("The {trip_type} Explorer"),
        summary: None,
        total_estimated_cost: Some(format!("₹{}", duration * 5000)),
        days,
        hotel_recommendations: vec![
            hotel("Grand City Stay", "Downtown", "₹5,000 ($60)", "4.8"),
            hotel("The Backpackers Loft", "Old Town", "₹1,200 ($15)", "4.3"),
            hotel("Riverside Boutique", "River Bank", "₹8,000 ($95)", "4.7"),
            hotel("City Center Inn", "Main Plaza", "₹3,500 ($42)", "4.0"),
            hotel("Heritage Haveli", "Historic District", "₹6,000 ($72)", "4.6"),
        ],
        dining_recommendations: vec![
            dining("The Golden Spoon", "Fine Dining", "City Center", "₹2,500 ($30)"),
            dining("Street Flavors", "Snacks", "Market", "₹200 ($3)"),
            dining("Cafe Sol", "Coffee & Brunch", "Art District", "₹600 ($7)"),
            dining("Mama's Kitchen", "Traditional", "Old Town", "₹1,200 ($15)"),
            dining("Spice Route", "Curry House", "Main St", "₹900 ($11)"),
        ],
        safety_tips: "Keep emergency numbers saved and stay hydrated.".to_string(),
    }
}
