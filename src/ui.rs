use crate::models::{DashboardView, Season};

pub fn render_index(view: &DashboardView) -> Result<String, serde_json::Error> {
    // keep the embedded JSON from closing the script element
    let initial = serde_json::to_string(view)?.replace("</", "<\\/");
    let min_date = view.start.map(|date| date.to_string()).unwrap_or_default();
    let max_date = view.end.map(|date| date.to_string()).unwrap_or_default();

    Ok(INDEX_HTML
        .replace("{{MIN_DATE}}", &min_date)
        .replace("{{MAX_DATE}}", &max_date)
        .replace("{{SEASON_LEGEND}}", &season_legend())
        .replace("{{INITIAL_VIEW}}", &initial))
}

fn season_legend() -> String {
    Season::all()
        .map(|season| format!("<li><strong>{season}</strong> {}</li>", season.label()))
        .collect::<Vec<_>>()
        .join("\n          ")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Bike Sharing Dashboard</title>
  <style>
    :root {
      --bg: #eef2f5;
      --ink: #23303b;
      --muted: #6d7a86;
      --bar: #d3d3d3;
      --highlight: #ffc0cb;
      --rf: #90caf9;
      --line: #2f6fde;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(35, 48, 59, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 260px 1fr;
      min-height: 100vh;
    }

    aside {
      background: var(--card);
      box-shadow: var(--shadow);
      padding: 28px 20px;
      display: grid;
      align-content: start;
      gap: 14px;
    }

    aside label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    main {
      padding: 32px;
      display: grid;
      gap: 28px;
      max-width: 1100px;
    }

    section {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 16px;
    }

    h1, h2 {
      margin: 0;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      border: 1px solid rgba(35, 48, 59, 0.08);
      border-radius: 14px;
      padding: 14px;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    svg {
      width: 100%;
      height: 260px;
    }

    .chart-label {
      font-size: 11px;
      fill: var(--muted);
    }

    .chart-line {
      fill: none;
      stroke: var(--line);
      stroke-width: 2.5;
    }

    .pair {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 16px;
    }

    table {
      border-collapse: collapse;
      width: 100%;
    }

    th, td {
      text-align: right;
      padding: 6px 10px;
      border-bottom: 1px solid rgba(35, 48, 59, 0.08);
    }

    button {
      justify-self: start;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      background: var(--ink);
      color: white;
      cursor: pointer;
    }

    .note {
      background: #e7f6ea;
      border-radius: 12px;
      padding: 12px 16px;
    }

    .status[data-type="error"] {
      color: #c0392b;
    }
  </style>
</head>
<body>
  <aside>
    <h2>Date range</h2>
    <label>Start
      <input type="date" id="start" min="{{MIN_DATE}}" max="{{MAX_DATE}}" value="{{MIN_DATE}}" />
    </label>
    <label>End
      <input type="date" id="end" min="{{MIN_DATE}}" max="{{MAX_DATE}}" value="{{MAX_DATE}}" />
    </label>
    <h2>Hour range</h2>
    <label>From <span id="start-hour-value">0</span>
      <input type="range" id="start-hour" min="0" max="23" value="0" />
    </label>
    <label>To <span id="end-hour-value">23</span>
      <input type="range" id="end-hour" min="0" max="23" value="23" />
    </label>
    <div class="status" id="status"></div>
  </aside>

  <main>
    <header>
      <h1>Bike Sharing Analysis</h1>
      <p>This dashboard looks at three questions a rental business would ask:</p>
      <ol>
        <li>Which season has the most rentals?</li>
        <li>How often have customers rented bikes in recent months?</li>
        <li>How do rentals change over the hours of the day, and when do they peak?</li>
      </ol>
    </header>

    <section>
      <h2>Daily orders</h2>
      <svg id="daily-chart" viewBox="0 0 600 260" role="img" aria-label="Daily orders"></svg>
      <div class="panel">
        <div class="stat"><span class="label">Total orders</span><span class="value" id="total-orders">0</span></div>
        <div class="stat"><span class="label">Days</span><span class="value" id="day-count">0</span></div>
      </div>
    </section>

    <section>
      <h2>Customers by season</h2>
      <svg id="season-chart" viewBox="0 0 600 260" role="img" aria-label="Customers by season"></svg>
      <p>Each number on the chart stands for a season code:</p>
      <ul>
          {{SEASON_LEGEND}}
      </ul>
      <button type="button" data-note="note-1">Show interpretation 1</button>
      <p class="note" id="note-1" hidden>The most customers were recorded in season 3, light snow and light rain with scattered clouds. Customers tend to rent bikes when the weather is not too hot, which makes cycling comfortable.</p>
    </section>

    <section>
      <h2>Recency and frequency per month</h2>
      <table>
        <thead><tr><th>Month</th><th>Recency (days)</th><th>Frequency</th></tr></thead>
        <tbody id="rf-rows"></tbody>
      </table>
      <div class="panel">
        <div class="stat"><span class="label">Average recency (days)</span><span class="value" id="avg-recency">0</span></div>
        <div class="stat"><span class="label">Average frequency</span><span class="value" id="avg-frequency">0</span></div>
      </div>
      <div class="pair">
        <svg id="recency-chart" viewBox="0 0 600 260" role="img" aria-label="By recency"></svg>
        <svg id="frequency-chart" viewBox="0 0 600 260" role="img" aria-label="By frequency"></svg>
      </div>
      <button type="button" data-note="note-2">Show interpretation 2</button>
      <p class="note" id="note-2" hidden>Over recent months many customers rented bikes often, as the low recency and high frequency values show.</p>
    </section>

    <section>
      <h2>Rentals by hour</h2>
      <svg id="hourly-chart" viewBox="0 0 600 260" role="img" aria-label="Rentals by hour"></svg>
      <button type="button" data-note="note-3">Show interpretation 3</button>
      <p class="note" id="note-3" hidden>Rentals rise in the late afternoon, especially between 16:00 and 17:00, a popular time for customers to ride.</p>
    </section>
  </main>

  <script id="initial-view" type="application/json">{{INITIAL_VIEW}}</script>
  <script>
    const $ = (id) => document.getElementById(id);
    const statusEl = $('status');
    const width = 600;
    const height = 260;
    const padX = 48;
    const padY = 34;
    const padTop = 20;
    // pink marks the third bar of the count-sorted season chart
    const SEASON_HIGHLIGHT = 2;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const emptyChart = (el) => {
      el.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data in range</text>';
    };

    const scale = (values) => {
      const max = Math.max(1, ...values);
      return (value) => height - padY - (value / max) * (height - padTop - padY);
    };

    const renderLine = (el, points) => {
      if (!points.length) {
        emptyChart(el);
        return;
      }
      const y = scale(points.map((p) => p.value));
      const step = points.length > 1 ? (width - padX * 2) / (points.length - 1) : 0;
      const x = (i) => padX + i * step;
      const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(2)} ${y(p.value).toFixed(2)}`).join(' ');
      const every = Math.max(1, Math.ceil(points.length / 10));
      const labels = points
        .map((p, i) => (i % every === 0
          ? `<text class="chart-label" x="${x(i)}" y="${height - padY + 18}" text-anchor="middle">${p.label}</text>`
          : ''))
        .join('');
      el.innerHTML = `<path class="chart-line" d="${path}" />${labels}`;
    };

    const renderBars = (el, bars, color, highlightIndex) => {
      if (!bars.length) {
        emptyChart(el);
        return;
      }
      const y = scale(bars.map((b) => b.value));
      const slot = (width - padX * 2) / bars.length;
      el.innerHTML = bars
        .map((b, i) => {
          const x = padX + i * slot + slot * 0.1;
          const fill = i === highlightIndex ? 'var(--highlight)' : color;
          return `<rect x="${x}" y="${y(b.value)}" width="${slot * 0.8}" height="${height - padY - y(b.value)}" fill="${fill}" />`
            + `<text class="chart-label" x="${x + slot * 0.4}" y="${height - padY + 18}" text-anchor="middle">${b.label}</text>`
            + `<text class="chart-label" x="${x + slot * 0.4}" y="${y(b.value) - 6}" text-anchor="middle">${b.value}</text>`;
        })
        .join('');
    };

    const render = (view) => {
      renderLine($('daily-chart'), view.daily_orders.map((d) => ({ label: d.date.slice(5), value: d.order_count })));
      $('total-orders').textContent = view.total_orders;
      $('day-count').textContent = view.daily_orders.length;

      renderBars($('season-chart'), view.seasons.map((s) => ({ label: s.season, value: s.customer_count })), 'var(--bar)', SEASON_HIGHLIGHT);

      $('rf-rows').innerHTML = view.recency_frequency
        .map((row) => `<tr><td>${row.month}</td><td>${row.recency}</td><td>${row.frequency}</td></tr>`)
        .join('');
      $('avg-recency').textContent = view.rf_averages.avg_recency;
      $('avg-frequency').textContent = view.rf_averages.avg_frequency;
      renderBars($('recency-chart'), view.top_recency.map((r) => ({ label: r.month, value: r.recency })), 'var(--rf)', -1);
      renderBars($('frequency-chart'), view.top_frequency.map((r) => ({ label: r.month, value: r.frequency })), 'var(--rf)', -1);

      renderLine($('hourly-chart'), view.hourly.map((h) => ({ label: h.hour, value: h.avg_hourly_count })));
    };

    const refresh = async () => {
      const params = new URLSearchParams();
      for (const [key, id] of [['start', 'start'], ['end', 'end'], ['start_hour', 'start-hour'], ['end_hour', 'end-hour']]) {
        if ($(id).value) {
          params.set(key, $(id).value);
        }
      }
      $('start-hour-value').textContent = $('start-hour').value;
      $('end-hour-value').textContent = $('end-hour').value;

      const res = await fetch(`/api/dashboard?${params}`);
      if (!res.ok) {
        throw new Error(await res.text());
      }
      render(await res.json());
      setStatus('', '');
    };

    for (const id of ['start', 'end', 'start-hour', 'end-hour']) {
      $(id).addEventListener('change', () => refresh().catch((err) => setStatus(err.message, 'error')));
    }

    document.querySelectorAll('button[data-note]').forEach((button) => {
      button.addEventListener('click', () => {
        const note = $(button.dataset.note);
        note.hidden = !note.hidden;
      });
    });

    render(JSON.parse($('initial-view').textContent));
  </script>
</body>
</html>
"##;
