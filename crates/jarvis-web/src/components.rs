//! UI Components

use jarvis_core::{Role, Turn};
use leptos::prelude::*;

/// Message bubble, styled by speaker
#[component]
pub fn MessageBubble(turn: Turn) -> impl IntoView {
    let (class, avatar) = match turn.role {
        Role::User => ("message message-user", "You"),
        Role::Assistant => ("message message-assistant", "✦"),
    };
    let time = turn.timestamp.format("%H:%M").to_string();

    view! {
        <div class=class>
            <span class="avatar">{avatar}</span>
            <div class="bubble">
                <p class="content">{turn.content}</p>
                <span class="time">{time}</span>
            </div>
        </div>
    }
}

/// Shown while a reply is outstanding
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="message message-assistant typing">
            <span class="avatar">"✦"</span>
            <div class="bubble">
                <span class="dot"></span>
                <span class="dot"></span>
                <span class="dot"></span>
            </div>
        </div>
    }
}

#[component]
pub fn FeatureCard(title: &'static str, description: &'static str) -> impl IntoView {
    view! {
        <div class="feature">
            <h3>{title}</h3>
            <p>{description}</p>
        </div>
    }
}
