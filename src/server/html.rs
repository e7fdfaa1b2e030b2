use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html as HtmlResponse;
use axum::routing::get;
use html::content::Navigation;
use html::root::{Body, Html};
use html::tables::{Table, TableCell, TableRow};
use reqwest::Url;
use serde::Deserialize;
use crate::config::ViewConfig;
use crate::record::RecordField;
use crate::server::http_error::HttpError;
use crate::server::AppState;
use crate::view::{RecordView, SortDirection, ViewPage};

pub(super) fn router() -> axum::Router<AppState>
{
	axum::Router::new()
		.route("/records",get(get_records_html))
}

#[derive(Deserialize,Default)]
pub(super) struct ListingConfig {
	search:Option<String>,
	sort:Option<String>,
	dir:Option<String>,
	page:Option<usize>,
}

impl ListingConfig
{
	fn apply(&self, view:&mut RecordView) -> crate::tools::Result<()>
	{
		if let Some(search) = &self.search {view.set_search(search.as_str());}
		if let Some(field) = &self.sort {
			let dir = self.dir.as_deref().map(str::parse::<SortDirection>).transpose()?.unwrap_or_default();
			view.set_sort(field.parse()?,dir);
		}
		if let Some(page) = self.page {view.go_to_page(page);}
		Ok(())
	}
}

fn listing_href(search:&str, field:RecordField, dir:SortDirection, page:usize) -> String
{
	let mut url = Url::parse("http://localhost/html/records").expect("static url must parse");
	url.query_pairs_mut()
		.append_pair("search",search)
		.append_pair("sort",field.wire_name())
		.append_pair("dir",&dir.to_string())
		.append_pair("page",&page.to_string());
	format!("?{}",url.query().unwrap_or_default())
}

fn wrap_body<T>(body:Body, title:T) -> Html where T:Into<std::borrow::Cow<'static, str>>
{
	Html::builder().lang("en")
		.head(|h|h
			.title(|t|t.text(title))
			.meta(|m|m.charset("utf-8"))
		)
		.push(body)
		.build()
}

fn make_table(page:&ViewPage, sorted_by:(RecordField,SortDirection)) -> Table
{
	let mut table_builder = Table::builder();
	table_builder.table_row(|r|
		RecordField::ALL.iter().fold(r,|r,field|{
			let label = match sorted_by {
				(f,SortDirection::Ascending) if f == *field => format!("{field} ▲"),
				(f,SortDirection::Descending) if f == *field => format!("{field} ▼"),
				_ => field.to_string()
			};
			r.table_header(|c|c.text(label.clone()))
		})
	);
	for record in &page.rows
	{
		let mut row_builder = TableRow::builder();
		for value in record.cells()
		{
			row_builder.push(TableCell::builder().text(value).build());
		}
		table_builder.push(row_builder.build());
	}
	table_builder.build()
}

/// links that toggle the sort like a click on the column header would
fn make_sort_nav(view:&RecordView) -> Navigation
{
	let (current,dir) = view.sort();
	Navigation::builder().class("sort")
		.ordered_list(|l|
			RecordField::ALL.into_iter().fold(l,|l,field|{
				let next_dir = if field == current {dir.flipped()} else {SortDirection::Ascending};
				let href = listing_href(view.search(),field,next_dir,view.requested_page());
				l.list_item(|i|i.anchor(|a|a.href(href).text(format!("sort by {field}"))))
			})
		)
		.build()
}

fn make_pager(view:&RecordView, page:&ViewPage) -> Navigation
{
	let (field,dir) = view.sort();
	let mut links = Vec::new();
	if page.has_previous() {
		links.push(("previous",listing_href(view.search(),field,dir,page.page-1)));
	}
	if page.has_next() {
		links.push(("next",listing_href(view.search(),field,dir,page.page+1)));
	}
	links.push(("export all","/records/export".to_string()));
	Navigation::builder().class("pager")
		.ordered_list(|l|
			links.into_iter().fold(l,|l,(text,href)|
				l.list_item(|i|i.anchor(|a|a.href(href).text(text)))
			)
		)
		.build()
}

async fn get_records_html(
	State(state):State<AppState>,
	headers:HeaderMap,
	Query(listing):Query<ListingConfig>
) -> Result<HtmlResponse<String>,HttpError>
{
	let mut view = RecordView::new(&ViewConfig{page_size:state.config.page_size});
	view.replace_records(state.store.all().await);
	listing.apply(&mut view).map_err(|e|HttpError::bad_request(e,&headers))?;

	let page = view.derive();
	let mut builder = Body::builder();
	builder.heading_1(|h|h.text("Records"));
	builder.paragraph(|p|p.text(format!(
		"{} matching records, page {} of {}",page.total_matches,page.page,page.total_pages
	)));
	builder.push(make_sort_nav(&view));
	builder.push(make_table(&page,view.sort()));
	builder.push(make_pager(&view,&page));
	Ok(HtmlResponse(wrap_body(builder.build(),"Records").to_string()))
}
