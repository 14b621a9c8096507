//! The campaign dashboard: one component owning the whole session state.
//!
//! Recipient data, the message template, pacing settings, the tracked send
//! job, and the reconciled analytics view all live in a single
//! `DashboardState`. Child markup only reads that state; every change goes
//! through `update`, one message at a time.

pub mod messages;
mod update;
mod view;

use std::cell::Cell;
use std::rc::Rc;

use yew::platform::spawn_local;
use yew::{Component, Context, Html};

use crate::services::{api, push};
use crate::state::DashboardState;

use self::messages::Msg;

pub struct DashboardComponent {
    state: DashboardState,
    /// Flipped off at teardown so results still in flight are discarded
    /// instead of applied.
    alive: Rc<Cell<bool>>,
}

impl Component for DashboardComponent {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let alive = Rc::new(Cell::new(true));

        // The push channel and the report poll run for the whole session,
        // whether or not a campaign is in flight.
        let link = ctx.link().clone();
        spawn_local(push::pump(
            alive.clone(),
            link.callback(Msg::PushReceived),
            link.callback(Msg::PushClosed),
        ));
        ctx.link().send_message(Msg::PollAnalytics);

        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            link.send_message(Msg::TemplatesLoaded(api::list_templates("").await));
        });

        Self {
            state: DashboardState::new(),
            alive,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(&mut self.state, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(&self.state, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.alive.set(false);
    }
}
