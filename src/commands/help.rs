pub fn execute() -> String {
    [
        "📖 Demand Analyzer Commands",
        "",
        "📥 Data",
        "  sources                            - List the stock sources available to `load`",
        "  load <source>                      - Fetch recent closes and volumes (e.g. `load Apple`, `load NVDA`)",
        "  manual <prices> ; <quantities>     - Enter comma-separated series (`|` also separates)",
        "  sample                             - Load the built-in demand schedule",
        "  data                               - Show the current observations",
        "",
        "📈 Regression",
        "  fit [linear|log|both]              - Fit the models (default: both)",
        "  equation [linear|log]              - Show the fitted equations",
        "  predict <linear|log> <price>       - Predict quantity at a price",
        "  curve <linear|log> [n]             - Sample the fitted curve over the price range",
        "",
        "🎨 Chart",
        "  view <both|linear|log>             - Choose which fitted lines are drawn",
        "  chart [path]                       - Render observations and fitted lines to a PNG",
        "",
        "  help                               - Show this message",
        "  quit | exit                        - Leave",
    ]
    .join("\n")
}
