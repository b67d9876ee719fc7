//! Home Page
//!
//! Static landing sections: navbar, hero, highlights, features, comparison,
//! about and footer.

use leptos::prelude::*;

use crate::components::FeatureCard;

struct Highlight {
    title: &'static str,
    description: &'static str,
}

struct ComparisonRow {
    feature: &'static str,
    jarvis: &'static str,
    chatgpt: &'static str,
    claude: &'static str,
}

const NAV_ITEMS: [(&str, &str); 4] = [
    ("Home", "#home"),
    ("Why Jarvis", "#why-jarvis"),
    ("Features", "#features"),
    ("About", "#about"),
];

const HIGHLIGHTS: [Highlight; 4] = [
    Highlight {
        title: "Lightning Fast",
        description: "Process requests in milliseconds with our advanced AI engine",
    },
    Highlight {
        title: "Always Learning",
        description: "Continuously improving through machine learning algorithms",
    },
    Highlight {
        title: "Secure & Private",
        description: "Enterprise-grade security keeping your data safe",
    },
    Highlight {
        title: "24/7 Available",
        description: "Round-the-clock assistance whenever you need it",
    },
];

const FEATURES: [Highlight; 3] = [
    Highlight {
        title: "Natural Language Processing",
        description: "JARVIS understands and responds to human language naturally and contextually, just like ChatGPT and Claude.",
    },
    Highlight {
        title: "Advanced Reasoning",
        description: "JARVIS can solve complex problems, analyze data, and provide intelligent insights similar to top AI models.",
    },
    Highlight {
        title: "Multi-Platform Support",
        description: "Seamlessly integrates across web, mobile, and desktop applications for consistent AI assistance.",
    },
];

const COMPARISON: [ComparisonRow; 5] = [
    ComparisonRow { feature: "Conversational Quality", jarvis: "Exceptional", chatgpt: "Good", claude: "Excellent" },
    ComparisonRow { feature: "Reasoning Ability", jarvis: "Advanced", chatgpt: "Good", claude: "Excellent" },
    ComparisonRow { feature: "Creative Tasks", jarvis: "Superior", chatgpt: "Good", claude: "Excellent" },
    ComparisonRow { feature: "Customization", jarvis: "High", chatgpt: "Limited", claude: "Limited" },
    ComparisonRow { feature: "Integration", jarvis: "Seamless", chatgpt: "Good", claude: "Good" },
];

const FOOTER_LINKS: [(&str, &str); 6] = [
    ("Home", "/"),
    ("Chat", "/chat"),
    ("Contact", "mailto:jarvis@support.com"),
    ("Blog", "#"),
    ("Privacy", "#"),
    ("Terms", "#"),
];

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <nav class="navbar">
                <a href="/" class="brand">"JARVIS"<span class="brand-dot"></span></a>
                <div class="nav-links">
                    {NAV_ITEMS
                        .iter()
                        .map(|(label, href)| view! { <a href=*href>{*label}</a> })
                        .collect_view()}
                    <a href="/chat" class="btn btn-primary">"Try Now"</a>
                </div>
            </nav>

            <header class="hero" id="home">
                <h1>"JARVIS"</h1>
                <p class="tagline">"Your Advanced AI Assistant"</p>
                <p class="description">
                    "Experience the future of artificial intelligence with JARVIS - a powerful, intuitive, \
                     and responsive AI assistant designed to assist you in every task. Engineered to provide \
                     human-like conversations and intelligent assistance."
                </p>
                <div class="cta">
                    <a href="/chat" class="btn btn-primary">"Start Conversation"</a>
                    <a href="#about" class="btn">"Learn More"</a>
                </div>
            </header>

            <section class="why" id="why-jarvis">
                <h2>"Why Choose JARVIS"</h2>
                <p class="subtitle">
                    "Experience the next generation of AI-powered assistance that adapts to your needs \
                     and amplifies your productivity."
                </p>
                <div class="highlights">
                    {HIGHLIGHTS
                        .iter()
                        .map(|h| view! { <FeatureCard title=h.title description=h.description /> })
                        .collect_view()}
                </div>
            </section>

            <section class="features" id="features">
                <h2>"Powerful Features"</h2>
                {FEATURES
                    .iter()
                    .map(|f| view! { <FeatureCard title=f.title description=f.description /> })
                    .collect_view()}
            </section>

            <section class="comparison">
                <h2>"Why Choose JARVIS"</h2>
                <table>
                    <thead>
                        <tr>
                            <th>"Feature"</th>
                            <th>"JARVIS"</th>
                            <th>"ChatGPT"</th>
                            <th>"Claude"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {COMPARISON
                            .iter()
                            .map(|row| view! {
                                <tr>
                                    <td>{row.feature}</td>
                                    <td class="jarvis">{row.jarvis}</td>
                                    <td class="chatgpt">{row.chatgpt}</td>
                                    <td class="claude">{row.claude}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </section>

            <section class="about" id="about">
                <h2>"About JARVIS"</h2>
                <p>
                    "JARVIS is an advanced artificial intelligence system designed to assist, inform, and \
                     enhance your daily life. Built with cutting-edge technology and powered by \
                     state-of-the-art machine learning algorithms, JARVIS represents the future of \
                     human-computer interaction. Comparable to leading AI assistants like Claude and \
                     ChatGPT, JARVIS offers human-like conversations and intelligent assistance."
                </p>
            </section>

            <footer class="footer">
                <h2>"JARVIS"</h2>
                <nav>
                    {FOOTER_LINKS
                        .iter()
                        .map(|(label, href)| view! { <a href=*href>{*label}</a> })
                        .collect_view()}
                </nav>
                <p class="copyright">"Copyright © JARVIS, Inc."</p>
                <p class="credits">
                    "Made by HARSH RANA • "
                    <a href="mailto:jarvis@support.com">"jarvis@support.com"</a>
                </p>
            </footer>
        </div>
    }
}
