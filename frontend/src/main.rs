use crate::app::App;

mod app;
mod components;
mod services;
mod state;

fn main() {
    yew::Renderer::<App>::new().render();
}
