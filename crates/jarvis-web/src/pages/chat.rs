//! Chat Page

use std::sync::Arc;

use jarvis_core::{ChatSession, GenerationService, provider::DEFAULT_MODEL};
use jarvis_runtime::{GeminiConfig, GeminiProvider};
use leptos::prelude::*;

use crate::components::{MessageBubble, TypingIndicator};

fn build_service(api_key: &str, model: &str) -> Arc<dyn GenerationService> {
    let config = GeminiConfig::new(api_key).with_model(model);
    Arc::new(GeminiProvider::with_client(config, reqwest::Client::new()))
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let (api_key, set_api_key) = signal(String::new());
    let (model, set_model) = signal(DEFAULT_MODEL.to_string());
    let session = RwSignal::new(ChatSession::new(build_service("", DEFAULT_MODEL)));

    let awaiting = move || session.with(ChatSession::is_awaiting_reply);

    let rebuild_service = move || {
        let service = build_service(&api_key.get_untracked(), &model.get_untracked());
        session.update(|s| s.set_service(service));
    };

    let new_chat = move |_| {
        let service = build_service(&api_key.get_untracked(), &model.get_untracked());
        session.set(ChatSession::new(service));
    };

    let send = move || {
        let pending = match session.try_update(ChatSession::begin_draft) {
            Some(Ok(Some(pending))) => pending,
            Some(Err(err)) => {
                leptos::logging::warn!("send ignored: {err}");
                return;
            }
            _ => return,
        };

        leptos::task::spawn_local(async move {
            let reply = pending.resolve().await;
            session.update(|s| {
                if let Err(err) = s.complete(reply) {
                    leptos::logging::error!("reply dropped: {err}");
                }
            });
        });
    };

    view! {
        <div class="chat">
            <aside class="sidebar">
                <button class="btn btn-primary new-chat" on:click=new_chat disabled=awaiting>
                    "+ New Chat"
                </button>

                <div class="history">
                    <h3>"Today"</h3>
                    <div class="history-entry active">{move || session.with(ChatSession::title)}</div>
                </div>

                <div class="settings">
                    <div class="field">
                        <label>"Gemini API Key"</label>
                        <input
                            type="password"
                            placeholder="Paste your API key"
                            prop:value=move || api_key.get()
                            on:input=move |ev| set_api_key.set(event_target_value(&ev))
                            on:change=move |_| rebuild_service()
                        />
                    </div>
                    <div class="field">
                        <label>"Model"</label>
                        <input
                            type="text"
                            prop:value=move || model.get()
                            on:input=move |ev| set_model.set(event_target_value(&ev))
                            on:change=move |_| rebuild_service()
                        />
                    </div>
                </div>
            </aside>

            <main class="chat-main">
                <header class="chat-header">
                    <h1>"JARVIS"</h1>
                    <a href="/" class="btn">"Go to Home"</a>
                </header>

                <div class="messages">
                    <For
                        each=move || {
                            session.with(|s| {
                                s.transcript().turns().iter().cloned().enumerate().collect::<Vec<_>>()
                            })
                        }
                        key=|entry| entry.0
                        children=move |(_, turn)| view! { <MessageBubble turn=turn /> }
                    />
                    <Show when=awaiting>
                        <TypingIndicator />
                    </Show>
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Message JARVIS..."
                        prop:value=move || session.with(|s| s.draft().to_string())
                        on:input=move |ev| session.update(|s| s.set_draft(event_target_value(&ev)))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send();
                            }
                        }
                    />
                    <button
                        on:click=move |_| send()
                        disabled=move || {
                            session.with(|s| s.is_awaiting_reply() || s.draft().trim().is_empty())
                        }
                    >
                        "Send"
                    </button>
                </div>

                <p class="powered-by">"Powered by Google Gemini AI"</p>
            </main>
        </div>
    }
}
