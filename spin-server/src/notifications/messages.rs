use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: &'static str,
    pub body: &'static str,
}

pub const NOTIFICATION_MESSAGES: [NotificationMessage; 5] = [
    NotificationMessage {
        title: "🎰 Time to Spin!",
        body: "Have you tried your luck today? Spin now and win!",
    },
    NotificationMessage {
        title: "🎯 Try Your Luck!",
        body: "The SpinON wheel is waiting for you. Jump in and win!",
    },
    NotificationMessage {
        title: "💰 Daily Luck!",
        body: "Don't forget to spin today's lucky wheel!",
    },
    NotificationMessage {
        title: "🔥 Spin Time!",
        body: "Spin the wheel on Base and win USDC!",
    },
    NotificationMessage {
        title: "🎲 Ready?",
        body: "SpinON is waiting! Spin the wheel and start winning!",
    },
];

pub fn random_message() -> NotificationMessage {
    let index = rand::thread_rng().gen_range(0..NOTIFICATION_MESSAGES.len());
    NOTIFICATION_MESSAGES[index]
}
