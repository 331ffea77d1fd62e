// Map document generation, split in two stages: `build_map_view` computes
// the marker geometry and styling, `render_map` serializes the result into a
// self-contained Leaflet page. Rendering is pure string assembly; identical
// inputs produce byte-identical documents.
use crate::catalog;
use crate::types::{SessionStats, ViewRow};
use crate::util::{format_int, format_pct};

/// Viewport center, roughly the geographic center of Mexico.
pub const MAP_CENTER: (f64, f64) = (23.6345, -102.5528);
pub const MAP_ZOOM: u8 = 5;
/// Bounding box clamp, southwest / northeast.
pub const MAP_BOUNDS_SW: (f64, f64) = (14.5388, -118.4662);
pub const MAP_BOUNDS_NE: (f64, f64) = (32.7186, -86.7104);

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// One circle marker, fully computed: no styling math happens at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub opacity: f64,
    pub count: u64,
    pub total: u64,
    pub percentage: f64,
    pub distribution: [u64; 5],
}

/// Everything the map document embeds for one polarity.
#[derive(Debug, Clone)]
pub struct MapView {
    pub polarity: u8,
    pub label: &'static str,
    pub color: &'static str,
    pub markers: Vec<Marker>,
    pub total_reviews: u64,
}

/// Compute marker geometry for the given projection.
///
/// Intensity is the count relative to the session maximum; it drives both
/// the radius (10..30 map pixels) and the fill opacity (0.3..1.0). Marker
/// order follows the projection's ranked order.
pub fn build_map_view(rows: &[ViewRow], polarity: u8, stats: &SessionStats) -> MapView {
    let markers = rows
        .iter()
        .map(|row| {
            let intensity = if stats.max_count > 0 {
                row.count as f64 / stats.max_count as f64
            } else {
                0.0
            };
            Marker {
                name: row.canonical.clone(),
                lat: row.coordinates.0,
                lon: row.coordinates.1,
                radius: 10.0 + intensity * 20.0,
                opacity: 0.3 + intensity * 0.7,
                count: row.count,
                total: row.total,
                percentage: row.percentage,
                distribution: row.all_polarities,
            }
        })
        .collect();
    MapView {
        polarity,
        label: catalog::polarity_label(polarity),
        color: catalog::polarity_color(polarity),
        markers,
        total_reviews: stats.total_reviews,
    }
}

/// File name of the per-polarity map document.
pub fn map_file_name(polarity: u8) -> String {
    format!(
        "mapa_polaridad_{}_{}.html",
        polarity,
        catalog::polarity_slug(polarity)
    )
}

/// Embed arbitrary text as a JavaScript string literal.
fn js_string(text: &str) -> String {
    // JSON string syntax is valid JavaScript and handles all escaping.
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

fn popup_html(view: &MapView, marker: &Marker) -> String {
    let mut html = String::new();
    html.push_str("<div style=\"font-family: Arial, sans-serif; width: 250px;\">");
    html.push_str(&format!(
        "<h3 style=\"margin: 0 0 10px 0; color: #1f2937; border-bottom: 2px solid {}; padding-bottom: 5px;\">{}</h3>",
        view.color, marker.name
    ));
    html.push_str(&format!(
        "<div style=\"margin: 5px 0;\"><strong>Polaridad {} ({}):</strong><br>\
         <span style=\"color: {}; font-size: 18px; font-weight: bold;\">{} rese\u{f1}as</span></div>",
        view.polarity,
        view.label,
        view.color,
        format_int(marker.count)
    ));
    html.push_str(&format!(
        "<div style=\"margin: 5px 0;\"><strong>Total del estado:</strong> {} rese\u{f1}as</div>",
        format_int(marker.total)
    ));
    html.push_str(&format!(
        "<div style=\"margin: 5px 0;\"><strong>Porcentaje:</strong> {}%</div>",
        format_pct(marker.percentage)
    ));
    html.push_str(
        "<hr style=\"margin: 10px 0; border: none; border-top: 1px solid #e5e7eb;\">\
         <div style=\"font-size: 12px; color: #6b7280;\"><strong>Distribuci\u{f3}n por polaridad:</strong><br>",
    );
    for polarity in 1..=5u8 {
        html.push_str(&format!(
            "<span style=\"color: {};\">\u{25cf}</span> {}: {}<br>",
            catalog::polarity_color(polarity),
            polarity,
            format_int(marker.distribution[(polarity - 1) as usize])
        ));
    }
    html.push_str("</div></div>");
    html
}

fn legend_html(view: &MapView) -> String {
    format!(
        "<div class=\"legend\">\
         <h4 style=\"margin: 0 0 10px 0;\">Rest-Mex 2025</h4>\
         <p style=\"margin: 5px 0;\"><strong>Polaridad {}</strong></p>\
         <p style=\"margin: 5px 0; color: {};\">{}</p>\
         <hr style=\"margin: 10px 0;\">\
         <p style=\"margin: 5px 0; font-size: 12px;\">\
         <span style=\"color: {};\">\u{25cf}</span> Tama\u{f1}o = Cantidad de rese\u{f1}as<br>\
         <span style=\"color: {};\">\u{25cf}</span> Intensidad = Concentraci\u{f3}n relativa<br>\
         <span style=\"color: {};\">\u{25cf}</span> Total: {} rese\u{f1}as</p>\
         </div>",
        view.polarity,
        view.color,
        view.label,
        view.color,
        view.color,
        view.color,
        format_int(view.total_reviews)
    )
}

/// Serialize a [`MapView`] into a complete Leaflet document.
pub fn render_map(view: &MapView) -> String {
    let title = format!(
        "Mapa M\u{e9}xico - Polaridad {} ({})",
        view.polarity, view.label
    );

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("<title>{}</title>\n", title));
    out.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}\">\n<script src=\"{}\"></script>\n",
        LEAFLET_CSS, LEAFLET_JS
    ));
    out.push_str(
        "<style>\n\
         html, body { margin: 0; padding: 0; height: 100%; }\n\
         #map { width: 100%; height: 100%; }\n\
         .map-title { position: absolute; top: 10px; left: 50%; transform: translateX(-50%);\n\
           background-color: rgba(255,255,255,0.8); padding: 10px; border-radius: 5px;\n\
           margin: 0; z-index: 1000; box-shadow: 0 2px 5px rgba(0,0,0,0.2);\n\
           font-family: Arial, sans-serif; }\n\
         .legend { position: fixed; top: 10px; right: 10px; width: 200px;\n\
           background-color: white; border: 2px solid grey; z-index: 9999; font-size: 14px;\n\
           padding: 10px; border-radius: 5px; box-shadow: 0 0 15px rgba(0,0,0,0.2);\n\
           font-family: Arial, sans-serif; }\n\
         .state-label { font-size: 10px; color: #374151; font-weight: bold;\n\
           text-shadow: 1px 1px 2px white; white-space: nowrap; }\n\
         </style>\n</head>\n<body>\n",
    );
    out.push_str(&format!("<h2 class=\"map-title\">{}</h2>\n", title));
    out.push_str("<div id=\"map\"></div>\n");
    out.push_str(&legend_html(view));
    out.push_str("\n<script>\n");
    out.push_str(&format!(
        "var map = L.map('map', {{ preferCanvas: true }}).setView([{}, {}], {});\n",
        MAP_CENTER.0, MAP_CENTER.1, MAP_ZOOM
    ));
    out.push_str(&format!(
        "L.tileLayer('{}', {{ attribution: '&copy; OpenStreetMap contributors' }}).addTo(map);\n",
        TILE_URL
    ));
    out.push_str(&format!(
        "map.fitBounds([[{}, {}], [{}, {}]]);\n",
        MAP_BOUNDS_SW.0, MAP_BOUNDS_SW.1, MAP_BOUNDS_NE.0, MAP_BOUNDS_NE.1
    ));

    for marker in &view.markers {
        let tooltip = format!(
            "{}: {} rese\u{f1}as",
            marker.name,
            format_int(marker.count)
        );
        out.push_str(&format!(
            "L.circleMarker([{}, {}], {{ radius: {:.2}, color: 'white', weight: 2, \
             fillColor: '{}', fillOpacity: {:.2} }})\n\
             .bindPopup({}, {{ maxWidth: 300 }})\n\
             .bindTooltip({})\n\
             .addTo(map);\n",
            marker.lat,
            marker.lon,
            marker.radius,
            view.color,
            marker.opacity,
            js_string(&popup_html(view, marker)),
            js_string(&tooltip)
        ));
        out.push_str(&format!(
            "L.marker([{}, {}], {{ icon: L.divIcon({{ className: 'state-label', html: {} }}) }}).addTo(map);\n",
            marker.lat,
            marker.lon,
            js_string(&format!("<div>{}</div>", marker.name))
        ));
    }

    out.push_str("</script>\n</body>\n</html>\n");
    out
}

/// Stat-card numbers shown at the bottom of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_reviews: usize,
    pub state_count: usize,
    pub type_count: usize,
}

/// Render the dashboard page: five polarity buttons swapping an iframe
/// between the per-polarity maps, with the neutral map loaded by default.
pub fn render_dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Dashboard Rest-Mex 2025 - An\u{e1}lisis por Polaridad</title>\n\
         <style>\n\
         body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;\n\
           margin: 0; padding: 20px; background-color: #f8fafc; }\n\
         .header { text-align: center; margin-bottom: 30px; background: white; padding: 20px;\n\
           border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }\n\
         .controls { display: flex; justify-content: center; gap: 10px; margin-bottom: 20px;\n\
           flex-wrap: wrap; }\n\
         .polarity-btn { padding: 10px 20px; border: none; border-radius: 25px; cursor: pointer;\n\
           font-weight: bold; font-size: 14px; transition: all 0.3s ease; color: white; }\n\
         .polarity-btn:hover { transform: translateY(-2px); box-shadow: 0 4px 15px rgba(0,0,0,0.2); }\n\
         .map-container { width: 100%; height: 70vh; border: 2px solid #e5e7eb; border-radius: 10px;\n\
           overflow: hidden; box-shadow: 0 4px 20px rgba(0,0,0,0.1); }\n\
         iframe { width: 100%; height: 100%; border: none; }\n\
         .stats { display: flex; justify-content: center; gap: 20px; margin-top: 20px; flex-wrap: wrap; }\n\
         .stat-card { background: white; padding: 15px; border-radius: 8px; text-align: center;\n\
           min-width: 120px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); }\n\
         .stat-number { font-size: 24px; font-weight: bold; margin-bottom: 5px; }\n\
         .stat-label { font-size: 12px; color: #6b7280; text-transform: uppercase; }\n\
         </style>\n</head>\n<body>\n\
         <div class=\"header\">\n\
         <h1>Dashboard Rest-Mex 2025</h1>\n\
         <p>An\u{e1}lisis geogr\u{e1}fico interactivo por polaridad de rese\u{f1}as tur\u{ed}sticas</p>\n\
         </div>\n\
         <div class=\"controls\">\n",
    );
    for polarity in 1..=5u8 {
        out.push_str(&format!(
            "<button class=\"polarity-btn\" style=\"background-color: {};\" onclick=\"loadMap({}, event)\">\
             {} - {}</button>\n",
            catalog::polarity_color(polarity),
            polarity,
            polarity,
            catalog::polarity_label(polarity)
        ));
    }
    out.push_str(
        "</div>\n\
         <div class=\"map-container\">\n\
         <iframe id=\"mapFrame\" src=\"mapa_default.html\"></iframe>\n\
         </div>\n\
         <div class=\"stats\">\n",
    );
    let cards = [
        (format_int(stats.total_reviews as u64), "Total Rese\u{f1}as"),
        (stats.state_count.to_string(), "Estados"),
        (stats.type_count.to_string(), "Tipos"),
        ("1-5".to_string(), "Polaridades"),
    ];
    for (number, label) in cards {
        out.push_str(&format!(
            "<div class=\"stat-card\"><div class=\"stat-number\">{}</div>\
             <div class=\"stat-label\">{}</div></div>\n",
            number, label
        ));
    }
    out.push_str(
        "</div>\n<script>\n\
         var mapFiles = {\n",
    );
    for polarity in 1..=5u8 {
        out.push_str(&format!(
            "  {}: '{}'{}\n",
            polarity,
            map_file_name(polarity),
            if polarity < 5 { "," } else { "" }
        ));
    }
    out.push_str(
        "};\n\
         function loadMap(polarity, event) {\n\
           document.getElementById('mapFrame').src = mapFiles[polarity];\n\
           document.querySelectorAll('.polarity-btn').forEach(function (btn) {\n\
             btn.style.opacity = '0.6';\n\
             btn.style.transform = 'scale(1)';\n\
           });\n\
           event.target.style.opacity = '1';\n\
           event.target.style.transform = 'scale(1.05)';\n\
         }\n\
         window.onload = function () {\n\
           document.querySelectorAll('.polarity-btn')[2].click();\n\
         };\n\
         </script>\n</body>\n</html>\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::project::project;
    use crate::types::ValidRow;

    fn row(region: &str, polarity: u8) -> ValidRow {
        ValidRow {
            region: region.to_string(),
            establishment_type: "hotel".to_string(),
            polarity,
        }
    }

    fn two_region_view() -> MapView {
        // Jalisco 10 reviews, Oaxaca 5 at polarity 4.
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.push(row("Jalisco", 4));
        }
        for _ in 0..5 {
            rows.push(row("Oaxaca", 4));
        }
        let agg = aggregate(&rows);
        let (view_rows, stats) = project(&agg, 4);
        build_map_view(&view_rows, 4, &stats)
    }

    #[test]
    fn marker_radius_and_opacity_scale_with_intensity() {
        let view = two_region_view();
        assert_eq!(view.markers.len(), 2);

        let max = &view.markers[0];
        assert_eq!(max.name, "Jalisco");
        assert_eq!(max.radius, 30.0);
        assert_eq!(max.opacity, 1.0);

        let half = &view.markers[1];
        assert_eq!(half.name, "Oaxaca");
        assert_eq!(half.radius, 20.0);
        assert!((half.opacity - 0.65).abs() < 1e-9);
    }

    #[test]
    fn empty_projection_uses_minimum_markers() {
        let agg = aggregate(&[row("Jalisco", 5)]);
        let (view_rows, stats) = project(&agg, 1);
        let view = build_map_view(&view_rows, 1, &stats);
        assert_eq!(view.markers[0].radius, 10.0);
        assert_eq!(view.markers[0].opacity, 0.3);
    }

    #[test]
    fn document_embeds_markers_and_legend() {
        let view = two_region_view();
        let doc = render_map(&view);
        assert_eq!(doc.matches("L.circleMarker(").count(), 2);
        assert!(doc.contains("radius: 30.00"));
        assert!(doc.contains("radius: 20.00"));
        assert!(doc.contains("fillColor: '#34D399'"));
        assert!(doc.contains("Positiva"));
        // Legend totals the selected polarity.
        assert!(doc.contains("Total: 15 rese\u{f1}as"));
        // Viewport constants.
        assert!(doc.contains("setView([23.6345, -102.5528], 5)"));
        assert!(doc.contains("fitBounds([[14.5388, -118.4662], [32.7186, -86.7104]])"));
    }

    #[test]
    fn popup_lists_the_full_distribution() {
        let view = two_region_view();
        let doc = render_map(&view);
        assert!(doc.contains("Total del estado:"));
        assert!(doc.contains("Porcentaje:"));
        assert!(doc.contains("100.0%"));
        for polarity in 1..=5u8 {
            assert!(doc.contains(catalog::polarity_color(polarity)));
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let view = two_region_view();
        assert_eq!(render_map(&view), render_map(&view));
    }

    #[test]
    fn map_file_names_follow_the_slug() {
        assert_eq!(map_file_name(1), "mapa_polaridad_1_muy_negativa.html");
        assert_eq!(map_file_name(3), "mapa_polaridad_3_neutral.html");
    }

    #[test]
    fn dashboard_embeds_buttons_and_stats() {
        let doc = render_dashboard(&DashboardStats {
            total_reviews: 9855,
            state_count: 19,
            type_count: 3,
        });
        assert!(doc.matches("polarity-btn").count() >= 5);
        assert!(doc.contains("9,855"));
        assert!(doc.contains("mapa_default.html"));
        assert!(doc.contains("mapa_polaridad_5_muy_positiva.html"));
    }
}
