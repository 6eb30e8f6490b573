//! HTML report generation
//!
//! This module renders the author groups as a single static HTML page: one
//! table per author, a description popup per product, and two selectors
//! that re-sort every table by price or rating in the browser.

use crate::output::group::AuthorGroups;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const REPORT_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Product List</title>
    <style>
        table { width: 100%; border-collapse: collapse; }
        th, td { border: 1px solid black; padding: 8px; text-align: left; width: 25%; }
        th { background-color: #f2f2f2; }
        .popup {
            display: none; position: fixed; z-index: 1; left: 0; top: 0;
            width: 100%; height: 100%; overflow: auto; background-color: rgba(0,0,0,0.4);
        }
        .popup-content {
            background-color: #fefefe; margin: 15% auto; padding: 20px;
            border: 1px solid #888; width: 80%;
        }
        .avatar { cursor: pointer; }
        .generated { color: #777; font-size: 0.9em; }
    </style>
</head>
<body>
    <h2>Product List</h2>
"#;

const REPORT_CONTROLS: &str = r#"    <label for="price-filter">Sort by Price:</label>
    <select id="price-filter" onchange="sortProducts()">
        <option value="all">All</option>
        <option value="low-to-high">Low to High</option>
        <option value="high-to-low">High to Low</option>
    </select>
    <label for="rating-filter">Sort by Rating:</label>
    <select id="rating-filter" onchange="sortProducts()">
        <option value="all">All</option>
        <option value="low-to-high">Low to High</option>
        <option value="high-to-low">High to Low</option>
    </select>
    <div id="product-list">
"#;

const REPORT_TAIL: &str = r#"    </div>
    <script>
        function openPopup(id) {
            document.getElementById(id).style.display = 'block';
        }
        function closePopup(id) {
            document.getElementById(id).style.display = 'none';
        }
        window.onclick = function(event) {
            const popups = document.getElementsByClassName('popup');
            for (let i = 0; i < popups.length; i++) {
                if (event.target == popups[i]) {
                    popups[i].style.display = 'none';
                }
            }
        };
        function numericAttr(row, name) {
            const value = parseFloat(row.getAttribute(name));
            return isNaN(value) ? 0 : value;
        }
        function sortProducts() {
            const priceOrder = document.getElementById('price-filter').value;
            const ratingOrder = document.getElementById('rating-filter').value;
            document.querySelectorAll('.product-table tbody').forEach(body => {
                const rows = Array.from(body.querySelectorAll('.product-row'));
                if (priceOrder !== 'all') {
                    rows.sort((a, b) => {
                        const diff = numericAttr(a, 'data-price') - numericAttr(b, 'data-price');
                        return priceOrder === 'low-to-high' ? diff : -diff;
                    });
                }
                if (ratingOrder !== 'all') {
                    rows.sort((a, b) => {
                        const diff = numericAttr(a, 'data-rating') - numericAttr(b, 'data-rating');
                        return ratingOrder === 'low-to-high' ? diff : -diff;
                    });
                }
                rows.forEach(row => body.appendChild(row));
            });
        }
    </script>
</body>
</html>
"#;

/// Escapes text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the report and writes it to `output_path`
///
/// # Arguments
///
/// * `groups` - Records grouped by author
/// * `output_path` - Path where the HTML file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_html_report(groups: &AuthorGroups, output_path: &Path) -> OutputResult<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = format_html_report(groups, &generated_at);

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;

    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats the author groups as an HTML document
pub fn format_html_report(groups: &AuthorGroups, generated_at: &str) -> String {
    let mut html = String::from(REPORT_HEAD);

    html.push_str(&format!(
        "    <p class=\"generated\">Generated {} - {} products from {} authors</p>\n",
        escape_html(generated_at),
        groups.total_products(),
        groups.len()
    ));
    html.push_str(REPORT_CONTROLS);

    let mut popup_id = 0usize;
    for group in groups {
        let author = escape_html(&group.author);
        html.push_str(&format!("        <h3>Author: {}</h3>\n", author));
        html.push_str("        <table class=\"product-table\">\n");
        html.push_str(
            "            <thead><tr><th>Product Name</th><th>Price (USD)</th><th>Image</th><th>Rating</th></tr></thead>\n",
        );
        html.push_str("            <tbody>\n");

        let mut popups = String::new();
        for product in &group.products {
            popup_id += 1;
            let id = format!("image-popup-{}", popup_id);
            let name = escape_html(&product.name);
            let rating = escape_html(&product.rating);

            html.push_str(&format!(
                "                <tr class=\"product-row\" data-price=\"{price}\" data-rating=\"{rating}\" data-author=\"{author}\">\
                 <td><a href=\"{link}\">{name}</a></td>\
                 <td>{price}</td>\
                 <td><img src=\"{image}\" alt=\"{name}\" class=\"avatar\" width=\"50\" height=\"50\" onclick=\"openPopup('{id}')\"></td>\
                 <td>{rating}</td></tr>\n",
                price = product.price,
                rating = rating,
                author = author,
                link = escape_html(&product.link),
                name = name,
                image = escape_html(&product.image),
                id = id,
            ));

            popups.push_str(&format!(
                "        <div id=\"{id}\" class=\"popup\" onclick=\"closePopup('{id}')\">\
                 <div class=\"popup-content\" onclick=\"event.stopPropagation();\">\
                 <h2>{name}</h2><p>{description}</p></div></div>\n",
                id = id,
                name = name,
                description = escape_html(&product.description),
            ));
        }

        html.push_str("            </tbody>\n");
        html.push_str("        </table>\n");
        html.push_str(&popups);
    }

    html.push_str(REPORT_TAIL);
    html
}
