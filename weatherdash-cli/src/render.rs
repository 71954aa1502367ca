//! Human-friendly output formatting for the terminal.

use weatherdash_core::{CurrentConditions, DaySummary, WeatherReport};

const MPS_TO_KMH: f64 = 3.6;

/// Resolve a provider icon code to its image URL (large variant).
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}

pub fn theme_name(dark: bool) -> &'static str {
    if dark { "dark" } else { "light" }
}

pub fn theme_glyph(dark: bool) -> &'static str {
    if dark { "🌙" } else { "☀️" }
}

/// Render a full query result: header, current conditions, forecast.
pub fn report(report: &WeatherReport, days: &[DaySummary], dark: bool) -> String {
    let mut out = header(&report.current, dark);
    out.push_str(&current_card(&report.current));
    out.push_str(&forecast_card(days));
    out
}

fn header(current: &CurrentConditions, dark: bool) -> String {
    format!(
        "{} {}, {} — {}\n\n",
        theme_glyph(dark),
        current.city,
        current.country,
        chrono::Local::now().format("%A, %B %-d, %Y"),
    )
}

fn current_card(current: &CurrentConditions) -> String {
    let mut out = format!(
        "Current Weather\n  {}°C  {}\n  Feels like {}°C · Humidity {}% · Wind {:.1} km/h\n",
        current.temperature_c.round() as i64,
        current.description,
        current.feels_like_c.round() as i64,
        current.humidity_pct,
        current.wind_speed_mps * MPS_TO_KMH,
    );

    out.push_str(&format!(
        "  Min {}°C · Max {}°C · Pressure {} hPa",
        current.temp_min_c.round() as i64,
        current.temp_max_c.round() as i64,
        current.pressure_hpa,
    ));
    if let Some(visibility) = current.visibility_m {
        out.push_str(&format!(" · Visibility {:.1} km", f64::from(visibility) / 1000.0));
    }
    out.push('\n');
    out.push_str(&format!("  {}\n\n", icon_url(&current.icon)));
    out
}

fn forecast_card(days: &[DaySummary]) -> String {
    let mut out = String::from("5-Day Forecast\n");
    for day in days {
        out.push_str(&format!(
            "  {:<3} {:<6}  {:>3}°C  {}",
            day.label, day.display_date, day.mean_temp_c, day.description,
        ));
        if let Some(humidity) = day.mean_humidity_pct {
            out.push_str(&format!(" · {humidity}%"));
        }
        if let Some(wind) = day.mean_wind_speed_mps {
            out.push_str(&format!(" · {wind:.1} m/s"));
        }
        out.push('\n');
    }
    out
}
