//! `create_interactive_component`: self-contained HTML/CSS/JS widgets.
//!
//! Output depends only on the arguments. Each feature token switches one
//! block of markup or script on.

use crate::args;
use async_trait::async_trait;
use openui_core::{Arguments, DisplayType, ToolError, ToolResult};
use openui_tools::ToolHandler;

const DEFAULT_STYLING: &str = "modern";

/// The widget families with a dedicated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Input fields with a submit handler.
    Form,
    /// Data table.
    Table,
    /// Dialog with open and close controls.
    Modal,
    /// Bar chart drawn on a canvas.
    Chart,
    /// Fallback container.
    Generic,
}

impl ComponentKind {
    /// Case-insensitive; anything unrecognised is [`ComponentKind::Generic`].
    pub fn parse(component_type: &str) -> Self {
        match component_type.to_ascii_lowercase().as_str() {
            "form" => Self::Form,
            "table" => Self::Table,
            "modal" => Self::Modal,
            "chart" => Self::Chart,
            _ => Self::Generic,
        }
    }
}

/// Renders the component markup.
pub fn render_component(component_type: &str, features: &[String], styling: &str) -> String {
    let has = |name: &str| features.iter().any(|f| f == name);
    match ComponentKind::parse(component_type) {
        ComponentKind::Form => form(styling, has("validation"), has("submission"), has("reset")),
        ComponentKind::Table => table(styling, has("search"), has("sorting"), has("pagination")),
        ComponentKind::Modal => modal(styling, has("backdrop"), has("animation")),
        ComponentKind::Chart => chart(styling),
        ComponentKind::Generic => generic(component_type, features, styling),
    }
}

const CARD_CSS: &str = "background: white; border-radius: 12px; padding: 2rem; \
box-shadow: 0 10px 25px rgba(0, 0, 0, 0.1); max-width: 600px; margin: 0 auto;";

fn form(styling: &str, validation: bool, submission: bool, reset: bool) -> String {
    let reset_button = if reset {
        r#"<button type="reset" class="bg-gray-300 text-gray-700 px-4 py-2 rounded-md hover:bg-gray-400">Reset</button>"#
    } else {
        ""
    };
    let validation_js = if validation {
        r#"
    if (!data.name || data.name.length < 2) {
      showMessage('Name must be at least 2 characters long', 'error');
      return;
    }
    if (!data.email || !data.email.includes('@')) {
      showMessage('Please enter a valid email address', 'error');
      return;
    }"#
    } else {
        ""
    };
    let outcome = if submission {
        "Form submitted successfully!"
    } else {
        "Form validation passed!"
    };

    format!(
        r#"<div class="form-container {styling}">
  <form id="dynamicForm" class="space-y-6">
    <div class="form-group">
      <label for="name" class="block text-sm font-medium text-gray-700">Name</label>
      <input type="text" id="name" name="name" required class="mt-1 block w-full rounded-md border-gray-300">
    </div>
    <div class="form-group">
      <label for="email" class="block text-sm font-medium text-gray-700">Email</label>
      <input type="email" id="email" name="email" required class="mt-1 block w-full rounded-md border-gray-300">
    </div>
    <div class="form-group">
      <label for="message" class="block text-sm font-medium text-gray-700">Message</label>
      <textarea id="message" name="message" rows="4" class="mt-1 block w-full rounded-md border-gray-300"></textarea>
    </div>
    <div class="form-actions space-x-3">
      <button type="submit" class="bg-indigo-600 text-white px-4 py-2 rounded-md hover:bg-indigo-700">Submit</button>
      {reset_button}
    </div>
  </form>
  <div id="formMessage" class="form-message" style="display: none;"></div>
</div>

<style>
  .form-container.{styling} {{ {CARD_CSS} }}
  .form-container input, .form-container textarea, .form-container button {{ transition: all 0.3s ease; }}
  .form-message {{ padding: 1rem; border-radius: 8px; margin-top: 1rem; }}
  .form-message.success {{ background-color: #d1fae5; color: #065f46; border: 1px solid #10b981; }}
  .form-message.error {{ background-color: #fee2e2; color: #991b1b; border: 1px solid #ef4444; }}
</style>

<script>
  document.getElementById('dynamicForm').addEventListener('submit', function (e) {{
    e.preventDefault();
    const data = Object.fromEntries(new FormData(this).entries());{validation_js}
    showMessage('{outcome}', 'success');
    console.log('Form data:', data);
  }});

  function showMessage(message, type) {{
    const box = document.getElementById('formMessage');
    box.textContent = message;
    box.className = 'form-message ' + type;
    box.style.display = 'block';
    setTimeout(() => {{ box.style.display = 'none'; }}, 5000);
  }}
</script>
"#
    )
}

fn table(styling: &str, search: bool, sorting: bool, pagination: bool) -> String {
    let search_box = if search {
        r#"<div class="search-container mb-4">
    <input type="text" id="searchInput" placeholder="Search..." class="w-full px-3 py-2 border rounded-md">
  </div>"#
    } else {
        ""
    };
    let sortable = if sorting { " sortable" } else { "" };
    let sort_marker = if sorting { " ↕" } else { "" };
    let pager = if pagination {
        r#"<div class="pagination-container mt-4 flex justify-between items-center">
    <div class="text-sm text-gray-700">Showing <span id="showing">1-10</span> of <span id="total">0</span> entries</div>
    <div class="flex space-x-2">
      <button id="prevBtn" class="px-3 py-1 border rounded">Previous</button>
      <button id="nextBtn" class="px-3 py-1 border rounded">Next</button>
    </div>
  </div>"#
    } else {
        ""
    };

    let page_slice = if pagination {
        "const pageData = currentData.slice((currentPage - 1) * itemsPerPage, currentPage * itemsPerPage);"
    } else {
        "const pageData = currentData;"
    };
    let page_status = if pagination {
        r#"
    const first = currentData.length === 0 ? 0 : (currentPage - 1) * itemsPerPage + 1;
    const last = Math.min(currentPage * itemsPerPage, currentData.length);
    document.getElementById('total').textContent = currentData.length;
    document.getElementById('showing').textContent = first + '-' + last;
    document.getElementById('prevBtn').disabled = currentPage === 1;
    document.getElementById('nextBtn').disabled = last >= currentData.length;"#
    } else {
        ""
    };
    let search_js = if search {
        r#"
  document.getElementById('searchInput').addEventListener('input', function (e) {
    const q = e.target.value.toLowerCase();
    currentData = sampleData.filter(row =>
      ['name', 'email', 'role'].some(key => row[key].toLowerCase().includes(q)));
    currentPage = 1;
    renderTable();
  });"#
    } else {
        ""
    };
    let sort_js = if sorting {
        r#"
  document.querySelectorAll('th[data-column]').forEach(th => {
    th.addEventListener('click', function () {
      const column = this.dataset.column;
      sortDirection = sortColumn === column && sortDirection === 'asc' ? 'desc' : 'asc';
      sortColumn = column;
      currentData.sort((a, b) => {
        const cmp = a[column] < b[column] ? -1 : a[column] > b[column] ? 1 : 0;
        return sortDirection === 'asc' ? cmp : -cmp;
      });
      renderTable();
    });
  });"#
    } else {
        ""
    };
    let pager_js = if pagination {
        r#"
  document.getElementById('prevBtn').addEventListener('click', () => {
    if (currentPage > 1) { currentPage--; renderTable(); }
  });
  document.getElementById('nextBtn').addEventListener('click', () => {
    if (currentPage < Math.ceil(currentData.length / itemsPerPage)) { currentPage++; renderTable(); }
  });"#
    } else {
        ""
    };

    format!(
        r#"<div class="table-container {styling}">
  {search_box}
  <div class="table-wrapper">
    <table id="dataTable" class="w-full border-collapse">
      <thead>
        <tr class="bg-gray-50">
          <th class="px-6 py-3 text-left{sortable}" data-column="name">Name{sort_marker}</th>
          <th class="px-6 py-3 text-left{sortable}" data-column="email">Email{sort_marker}</th>
          <th class="px-6 py-3 text-left{sortable}" data-column="role">Role{sort_marker}</th>
          <th class="px-6 py-3 text-left">Actions</th>
        </tr>
      </thead>
      <tbody id="tableBody" class="bg-white divide-y divide-gray-200"></tbody>
    </table>
  </div>
  {pager}
</div>

<style>
  .table-container.{styling} {{ {CARD_CSS} max-width: none; padding: 1.5rem; }}
  .table-wrapper {{ overflow-x: auto; border-radius: 8px; border: 1px solid #e5e7eb; }}
  #dataTable {{ min-width: 600px; }}
  #dataTable tbody tr:hover {{ background-color: #f9fafb; }}
  th.sortable {{ cursor: pointer; }}
  .action-btn {{ padding: 0.25rem 0.75rem; border-radius: 0.375rem; font-size: 0.875rem; cursor: pointer; color: white; }}
  .action-btn.edit {{ background-color: #3b82f6; }}
  .action-btn.delete {{ background-color: #ef4444; }}
</style>

<script>
  const sampleData = [
    {{ id: 1, name: 'John Doe', email: 'john@example.com', role: 'Admin' }},
    {{ id: 2, name: 'Jane Smith', email: 'jane@example.com', role: 'User' }},
    {{ id: 3, name: 'Bob Johnson', email: 'bob@example.com', role: 'Editor' }},
    {{ id: 4, name: 'Alice Brown', email: 'alice@example.com', role: 'User' }},
    {{ id: 5, name: 'Charlie Wilson', email: 'charlie@example.com', role: 'Admin' }}
  ];
  let currentData = [...sampleData];
  let currentPage = 1;
  const itemsPerPage = 10;
  let sortColumn = null;
  let sortDirection = 'asc';

  function renderTable() {{
    {page_slice}
    document.getElementById('tableBody').innerHTML = pageData.map(row => `
      <tr>
        <td class="px-6 py-4">${{row.name}}</td>
        <td class="px-6 py-4">${{row.email}}</td>
        <td class="px-6 py-4">${{row.role}}</td>
        <td class="px-6 py-4 space-x-2">
          <button class="action-btn edit" onclick="editItem(${{row.id}})">Edit</button>
          <button class="action-btn delete" onclick="deleteItem(${{row.id}})">Delete</button>
        </td>
      </tr>`).join('');{page_status}
  }}
{search_js}{sort_js}{pager_js}
  function editItem(id) {{
    alert('Edit item: ' + JSON.stringify(currentData.find(row => row.id === id), null, 2));
  }}

  function deleteItem(id) {{
    if (confirm('Are you sure you want to delete this item?')) {{
      currentData = currentData.filter(row => row.id !== id);
      renderTable();
    }}
  }}

  renderTable();
</script>
"#
    )
}

fn modal(styling: &str, backdrop: bool, animation: bool) -> String {
    let animated = if animation { " animated" } else { "" };
    let animation_css = if animation {
        r#"
  .modal-overlay.animated { animation: fadeIn 0.3s ease; }
  .modal-overlay.animated .modal-content { animation: slideIn 0.3s ease; }
  @keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
  @keyframes slideIn { from { transform: translateY(-40px); opacity: 0; } to { transform: translateY(0); opacity: 1; } }"#
    } else {
        ""
    };
    let backdrop_js = if backdrop {
        r#"
  modal.addEventListener('click', (e) => { if (e.target === modal) closeModal(); });"#
    } else {
        ""
    };

    format!(
        r#"<div class="modal-demo {styling}">
  <button id="openModal" class="bg-blue-600 text-white px-6 py-3 rounded-lg hover:bg-blue-700">Open Modal</button>
  <div id="modal" class="modal-overlay{animated}" style="display: none;">
    <div class="modal-content">
      <div class="modal-header">
        <h2 class="text-xl font-bold">Modal Title</h2>
        <button id="closeModal" class="text-gray-500 hover:text-gray-700 text-2xl">&times;</button>
      </div>
      <div class="modal-body">
        <p>This is a modal dialog. You can put any content here.</p>
      </div>
      <div class="modal-footer">
        <button id="cancelBtn" class="bg-gray-300 text-gray-700 px-4 py-2 rounded">Cancel</button>
        <button id="confirmBtn" class="bg-blue-600 text-white px-4 py-2 rounded">Confirm</button>
      </div>
    </div>
  </div>
</div>

<style>
  .modal-overlay {{ position: fixed; inset: 0; background-color: rgba(0, 0, 0, 0.5); display: flex;
    justify-content: center; align-items: center; z-index: 1000; }}
  .modal-content {{ background: white; border-radius: 12px; max-width: 500px; width: 90%; max-height: 80vh;
    overflow-y: auto; box-shadow: 0 20px 40px rgba(0, 0, 0, 0.2); }}
  .modal-header {{ display: flex; justify-content: space-between; align-items: center; padding: 1.5rem;
    border-bottom: 1px solid #e5e7eb; }}
  .modal-body {{ padding: 1.5rem; }}
  .modal-footer {{ display: flex; justify-content: flex-end; gap: 0.75rem; padding: 1.5rem;
    border-top: 1px solid #e5e7eb; }}{animation_css}
</style>

<script>
  const modal = document.getElementById('modal');
  function openModal() {{ modal.style.display = 'flex'; document.body.style.overflow = 'hidden'; }}
  function closeModal() {{ modal.style.display = 'none'; document.body.style.overflow = 'auto'; }}
  document.getElementById('openModal').addEventListener('click', openModal);
  document.getElementById('closeModal').addEventListener('click', closeModal);
  document.getElementById('cancelBtn').addEventListener('click', closeModal);
  document.getElementById('confirmBtn').addEventListener('click', () => {{
    alert('Confirmed!');
    closeModal();
  }});
  document.addEventListener('keydown', (e) => {{ if (e.key === 'Escape') closeModal(); }});{backdrop_js}
</script>
"#
    )
}

fn chart(styling: &str) -> String {
    format!(
        r#"<div class="chart-container {styling}">
  <canvas id="myChart" width="400" height="200"></canvas>
</div>

<style>
  .chart-container.{styling} {{ {CARD_CSS} }}
  #myChart {{ max-width: 100%; height: auto; }}
</style>

<script>
  const canvas = document.getElementById('myChart');
  const ctx = canvas.getContext('2d');
  const data = [
    {{ label: 'January', value: 65 }},
    {{ label: 'February', value: 59 }},
    {{ label: 'March', value: 80 }},
    {{ label: 'April', value: 81 }},
    {{ label: 'May', value: 56 }},
    {{ label: 'June', value: 55 }}
  ];
  const colors = ['#3b82f6', '#ef4444', '#10b981', '#f59e0b', '#8b5cf6', '#06b6d4'];

  function drawChart() {{
    const padding = 40;
    const chartWidth = canvas.width - padding * 2;
    const chartHeight = canvas.height - padding * 2;
    const maxValue = Math.max(...data.map(d => d.value));
    const barWidth = chartWidth / data.length * 0.8;
    const gap = chartWidth / data.length * 0.2;

    ctx.clearRect(0, 0, canvas.width, canvas.height);
    data.forEach((d, i) => {{
      const barHeight = (d.value / maxValue) * chartHeight;
      const x = padding + i * (barWidth + gap) + gap / 2;
      const y = canvas.height - padding - barHeight;
      ctx.fillStyle = colors[i % colors.length];
      ctx.fillRect(x, y, barWidth, barHeight);
      ctx.fillStyle = '#374151';
      ctx.font = '12px sans-serif';
      ctx.textAlign = 'center';
      ctx.fillText(d.value, x + barWidth / 2, y - 5);
      ctx.fillText(d.label.slice(0, 3), x + barWidth / 2, canvas.height - padding + 15);
    }});
  }}

  drawChart();
</script>
"#
    )
}

fn generic(component_type: &str, features: &[String], styling: &str) -> String {
    let items: String = features.iter().map(|f| format!("<li>{f}</li>")).collect();
    let joined = features.join(", ");
    format!(
        r#"<div class="generic-component {styling}">
  <h2 class="text-2xl font-bold mb-4">{component_type} Component</h2>
  <p class="text-gray-600 mb-4">This is a generic {component_type} component with the following features:</p>
  <ul class="list-disc list-inside space-y-2">{items}</ul>
  <div class="mt-6 p-4 bg-gray-50 rounded-lg">
    <p class="text-sm text-gray-700">This component would typically include functionality for: {joined}</p>
  </div>
</div>

<style>
  .generic-component.{styling} {{ {CARD_CSS} }}
</style>
"#
    )
}

/// Handler for `create_interactive_component`.
pub struct ComponentTool;

impl ComponentTool {
    /// Stateless handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComponentTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for ComponentTool {
    async fn call(&self, args: Arguments) -> Result<ToolResult, ToolError> {
        let component_type = args::text(&args, "componentType").unwrap_or_default();
        let features = args::comma_list(&args::text(&args, "features").unwrap_or_default());
        let styling = args::text(&args, "styling")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STYLING.to_string());
        Ok(ToolResult::success(
            render_component(&component_type, &features, &styling),
            DisplayType::Html,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn features(list: &str) -> Vec<String> {
        args::comma_list(list)
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(ComponentKind::parse("TABLE"), ComponentKind::Table);
        assert_eq!(ComponentKind::parse("Form"), ComponentKind::Form);
        assert_eq!(ComponentKind::parse("dashboard"), ComponentKind::Generic);
    }

    #[test]
    fn test_form_feature_toggles() {
        let plain = render_component("form", &features("validation"), "modern");
        assert!(plain.contains("Name must be at least 2 characters long"));
        assert!(!plain.contains(r#"type="reset""#));
        assert!(plain.contains("Form validation passed!"));

        let full = render_component("form", &features("submission, reset"), "minimal");
        assert!(full.contains(r#"type="reset""#));
        assert!(full.contains("Form submitted successfully!"));
        assert!(!full.contains("valid email"));
        assert!(full.contains("form-container minimal"));
    }

    #[test]
    fn test_table_feature_toggles() {
        let bare = render_component("table", &[], "modern");
        assert!(!bare.contains("searchInput"));
        assert!(!bare.contains("prevBtn"));
        assert!(!bare.contains("text-left sortable"));

        let full = render_component("table", &features("search,sorting,pagination"), "modern");
        assert!(full.contains("searchInput"));
        let sortable = r#"class="px-6 py-3 text-left sortable" data-column="name""#;
        assert!(full.contains(sortable));
        assert!(full.contains("prevBtn"));
    }

    #[test]
    fn test_modal_feature_toggles() {
        let html = render_component("modal", &features("backdrop,animation"), "modern");
        assert!(html.contains("modal-overlay animated"));
        assert!(html.contains("@keyframes fadeIn { from { opacity: 0; }"));
        assert!(html.contains("e.target === modal"));
        let plain = render_component("modal", &[], "modern");
        assert!(!plain.contains("@keyframes"));
    }

    #[test]
    fn test_generic_lists_features() {
        let html = render_component("dashboard", &features("charts, filters"), "modern");
        assert!(html.contains("dashboard Component"));
        assert!(html.contains("<li>charts</li><li>filters</li>"));
        assert!(html.contains("functionality for: charts, filters"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let f = features("search");
        assert_eq!(
            render_component("table", &f, "x"),
            render_component("table", &f, "x")
        );
    }

    #[tokio::test]
    async fn test_styling_defaults_to_modern() {
        let mut args = Arguments::new();
        args.insert("componentType".into(), serde_json::json!("chart"));
        args.insert("features".into(), serde_json::json!(""));
        let result = ComponentTool::new().call(args).await.unwrap();
        assert_eq!(result.display_type(), DisplayType::Html);
        let html = result.data.unwrap();
        assert!(html.as_str().unwrap().contains("chart-container modern"));
    }
}
