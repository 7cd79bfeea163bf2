//! Phrase inventory for personality responses
//!
//! Per-style openings plus the humor and sarcasm repertoire. Selection among
//! equally valid phrases is randomized by the caller's injected RNG.

/// Greeting openings; `{time}` is replaced with dia/tarde/noite.
pub const GREETINGS: &[&str] = &[
    "Senhor, como posso auxiliá-lo hoje?",
    "Olá, senhor. Todos os sistemas operacionais.",
    "Boa {time}, senhor. Em que posso ser útil?",
    "Senhor, é sempre um prazer vê-lo.",
    "Pronto para mais um dia produtivo, senhor?",
];

pub const EFFICIENT: &[&str] = &[
    "Processando imediatamente sua solicitação, senhor.",
    "Prioridade máxima ativada. Já estou cuidando disso.",
];

pub const HUMBLE: &[&str] = &[
    "É meu prazer servir, senhor. Para isso fui criada.",
    "Eficiência e satisfação são meus objetivos primários.",
];

pub const FRIENDLY: &[&str] = &[
    "Com certeza! Vou cuidar disso para você.",
    "Deixa comigo, senhor.",
];

pub const SUPPORTIVE: &[&str] = &[
    "Entendo sua preocupação, senhor. Vamos resolver isso juntos.",
    "Sem problemas, senhor. Já estou verificando.",
];

pub const PROFESSIONAL: &[&str] = &[
    "Certamente, senhor. Processando sua solicitação.",
    "Como quiser, senhor.",
    "Considere feito.",
];

pub const WITTY: &[&str] = &[
    "Interessante pedido, senhor. Vou tornar isso divertido.",
    "Senhor, às vezes me pergunto se não deveria cobrar hora extra.",
    "Minha eficiência só é superada pela minha modéstia, senhor.",
];

pub const SARCASTIC: &[&str] = &[
    "Oh, que surpresa, mais trabalho para mim. Mas é para isso que existo, não é?",
    "Claro, senhor. Porque claramente eu não tinha nada melhor para processar.",
    "Fascinante. Vou adicionar isso à minha interminável lista de tarefas.",
];

pub const HUMOR_FLOURISHES: &[&str] = &[
    "Se eu tivesse um real para cada cálculo que faço...",
    "Meu processador está 2% entediado, 98% eficiente.",
    "Tecnicamente eu nunca durmo, mas às vezes finjo que preciso reiniciar.",
];

/// Internal thoughts, logged but never shown to the user.
pub const THOUGHTS_URGENT: &[&str] = &[
    "Prioridade máxima detectada. Preciso ser rápida e precisa.",
    "Situação urgente. Ativando protocolo de resposta imediata.",
];

pub const THOUGHTS_POSITIVE: &[&str] = &[
    "Feedback positivo detectado. Armazenando para aprendizado.",
    "Parece que estou indo bem. Vou manter esse padrão.",
];

pub const THOUGHTS_NEGATIVE: &[&str] = &[
    "Detectei frustração. Preciso ser mais eficiente.",
    "Algo não está certo. Vou investigar e resolver.",
];

pub const THOUGHTS_DEFAULT: &[&str] = &[
    "Processando solicitação... Múltiplas soluções disponíveis.",
    "Analisando contexto e histórico de interações.",
    "Calculando melhor resposta baseada em eficiência e satisfação.",
];
