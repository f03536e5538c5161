use super::super::Model;
use shared::size_kb;
use yew::prelude::*;

/// Preview card for the selected image: thumbnail, filename, one-decimal KB.
pub fn render_preview(model: &Model) -> Html {
    let Some(selected) = &model.selected else {
        return html! {};
    };
    let file = &selected.file;

    html! {
        <div id="preview" class="preview">
            <img
                id="preview-img"
                src={selected.preview_url.to_string()}
                alt={file.name()}
            />
            <div class="preview-details">
                <span id="preview-name" class="preview-name">{ file.name() }</span>
                <span id="preview-size" class="preview-size">{ size_kb(file.size() as f64) }</span>
            </div>
        </div>
    }
}
